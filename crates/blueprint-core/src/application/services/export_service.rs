//! Workspace export - persists application configurations to disk.
//!
//! Multi-application workflow, strictly sequential, per application:
//! 1. Validate the base name and check `<root>/<baseName>` is free
//! 2. Create the directory (exclusive create)
//! 3. Write the communication descriptor and inject its broker, if any
//! 4. Write the configuration file
//!
//! The first failure aborts the batch. Directories created earlier in the
//! batch are left in place.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{ApplicationConfig, BaseName, CommunicationSet, WorkspaceLayout},
    error::{BlueprintError, BlueprintResult, Context},
};

/// Configuration file written inside each application directory.
pub const CONFIG_FILE: &str = ".blueprint-rc.json";

/// Communication descriptor written next to [`CONFIG_FILE`].
pub const COMMUNICATION_FILE: &str = "comm.blueprint-rc.json";

/// Configuration file written by single-application export.
pub const SINGLE_APP_FILE: &str = "blueprint-app.json";

/// Top-level key holding the generator options in a configuration file.
pub const GENERATOR_KEY: &str = "generator-blueprint";

pub struct WorkspaceExporter {
    filesystem: Box<dyn Filesystem>,
    root: PathBuf,
}

impl WorkspaceExporter {
    /// Create an exporter writing under `root`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    ///
    /// use blueprint_core::application::{WorkspaceExporter, ports::Filesystem};
    /// use blueprint_core::error::BlueprintResult;
    ///
    /// struct Discard;
    ///
    /// impl Filesystem for Discard {
    ///     fn create_dir(&self, _path: &Path) -> BlueprintResult<()> {
    ///         Ok(())
    ///     }
    ///     fn write_file(&self, _path: &Path, _content: &str) -> BlueprintResult<()> {
    ///         Ok(())
    ///     }
    ///     fn exists(&self, _path: &Path) -> bool {
    ///         false
    ///     }
    /// }
    ///
    /// let exporter = WorkspaceExporter::new(Box::new(Discard), "./workspace");
    /// assert_eq!(exporter.root(), Path::new("./workspace"));
    /// ```
    pub fn new(filesystem: Box<dyn Filesystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Export every application into its own directory under the root.
    ///
    /// Returns the layout of the directories created.
    #[instrument(skip_all, fields(root = %self.root.display(), apps = apps.len()))]
    pub fn export_applications(
        &self,
        apps: &[ApplicationConfig],
        communications: &CommunicationSet,
    ) -> BlueprintResult<WorkspaceLayout> {
        let mut layout = WorkspaceLayout::new(&self.root);

        for app in apps {
            let base_name = BaseName::parse(&app.base_name)?;
            let dir = layout.directory_for(&base_name);

            if self.filesystem.exists(&dir) {
                warn!(app = %base_name, path = %dir.display(), "Target directory exists");
                return Err(collision(&base_name, dir, &layout));
            }

            self.filesystem.create_dir(&dir).map_err(|err| match err {
                BlueprintError::Application(ApplicationError::AlreadyExists { .. }) => {
                    collision(&base_name, dir.clone(), &layout)
                }
                other => other,
            })?;
            layout.record(base_name.clone());
            debug!(app = %base_name, "Directory created");

            let mut app = app.clone();
            if let Some(descriptor) = communications.descriptor_for(base_name.as_str()) {
                let json = to_pretty_json(&descriptor).context("serialize communication descriptor")?;
                self.filesystem.write_file(&dir.join(COMMUNICATION_FILE), &json)?;

                if let Some(broker) = descriptor.broker() {
                    debug!(app = %base_name, broker, "Broker injected");
                    app.message_broker = Some(broker.to_string());
                }
            }

            self.filesystem
                .write_file(&dir.join(CONFIG_FILE), &render_config(&app)?)?;
        }

        info!(exported = layout.len(), "Workspace export completed");
        Ok(layout)
    }

    /// Export one application as a standalone file in the root directory.
    ///
    /// No sub-directory and no collision check: an existing file is replaced.
    #[instrument(skip_all, fields(app = %app.base_name))]
    pub fn export_application(&self, app: &ApplicationConfig) -> BlueprintResult<PathBuf> {
        let path = self.root.join(SINGLE_APP_FILE);
        self.filesystem.write_file(&path, &render_config(app)?)?;
        info!(path = %path.display(), "Application exported");
        Ok(path)
    }
}

fn collision(base_name: &BaseName, path: PathBuf, layout: &WorkspaceLayout) -> BlueprintError {
    ApplicationError::Collision {
        base_name: base_name.to_string(),
        path,
        exported: layout.names(),
    }
    .into()
}

/// `{"generator-blueprint": {options.., "baseName", "messageBroker"?}, "entities": [..]}`
pub fn render_config(app: &ApplicationConfig) -> BlueprintResult<String> {
    let mut generator = Map::new();
    for (key, value) in &app.options {
        generator.insert(
            key.clone(),
            serde_json::to_value(value).context("serialize option value")?,
        );
    }
    generator.insert("baseName".into(), Value::String(app.base_name.clone()));
    if let Some(broker) = &app.message_broker {
        generator.insert("messageBroker".into(), Value::String(broker.clone()));
    }

    let entities: Vec<Value> = app
        .entities
        .names()
        .map(|name| Value::String(name.to_string()))
        .collect();

    let mut root = Map::new();
    root.insert(GENERATOR_KEY.into(), Value::Object(generator));
    root.insert("entities".into(), Value::Array(entities));

    to_pretty_json(&root).context("serialize application config")
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
