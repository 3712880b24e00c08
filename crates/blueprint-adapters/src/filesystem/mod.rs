//! Filesystem adapters implementing the `Filesystem` port.
//!
//! Both treat `create_dir` as exclusive and never create missing parents.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
