//! Loader and exporter wired together over the in-memory filesystem.

use std::path::{Path, PathBuf};

use blueprint_adapters::{ConfigLoader, InputFormat, MemoryFilesystem};
use blueprint_core::{
    application::{
        Filesystem, WorkspaceExporter,
        services::{COMMUNICATION_FILE, CONFIG_FILE},
    },
    domain::{CommunicationLink, CommunicationSet},
};

const APPS_TOML: &str = r#"
[[applications]]
baseName = "gateway"

[applications.options]
skipClient = false

[[applications]]
baseName = "store"

[applications.entities.Book]
fields = [{ fieldName = "title", fieldType = "String" }]
"#;

fn exporter(fs: &MemoryFilesystem) -> WorkspaceExporter {
    WorkspaceExporter::new(Box::new(fs.clone()), "/ws")
}

#[test]
fn toml_workspace_exports_in_input_order() {
    let apps = ConfigLoader::new()
        .parse_applications(APPS_TOML, InputFormat::Toml, Path::new("apps.toml"))
        .unwrap();
    let fs = MemoryFilesystem::with_root("/ws");
    let comms = CommunicationSet::new(vec![CommunicationLink::new("gateway", "store").via("rabbitmq")]);

    let layout = exporter(&fs).export_applications(&apps, &comms).unwrap();

    assert_eq!(layout.names(), ["gateway", "store"]);
    for name in ["gateway", "store"] {
        let dir = PathBuf::from("/ws").join(name);
        let config = fs.read_file(&dir.join(CONFIG_FILE)).unwrap();
        assert!(config.contains("\"messageBroker\": \"rabbitmq\""));
        assert!(fs.exists(&dir.join(COMMUNICATION_FILE)));
    }

    let store = fs.read_file(Path::new("/ws/store").join(CONFIG_FILE).as_path()).unwrap();
    assert!(store.contains("\"Book\""));
}

#[test]
fn duplicate_base_names_stop_the_batch() {
    let apps = ConfigLoader::new()
        .parse_applications(
            r#"[{"baseName": "store"}, {"baseName": "store"}, {"baseName": "billing"}]"#,
            InputFormat::Json,
            Path::new("apps.json"),
        )
        .unwrap();
    let fs = MemoryFilesystem::with_root("/ws");

    let err = exporter(&fs)
        .export_applications(&apps, &CommunicationSet::default())
        .unwrap_err();

    assert!(err.is_collision());
    let store_dirs = fs
        .list_directories()
        .into_iter()
        .filter(|dir| dir.ends_with("store"))
        .count();
    assert_eq!(store_dirs, 1);
    assert!(!fs.exists(Path::new("/ws/billing")));
}

#[test]
fn unlinked_apps_get_no_descriptor() {
    let apps = ConfigLoader::new()
        .parse_applications(r#"{"baseName": "solo"}"#, InputFormat::Json, Path::new("solo.json"))
        .unwrap();
    let fs = MemoryFilesystem::with_root("/ws");

    exporter(&fs)
        .export_applications(&apps, &CommunicationSet::default())
        .unwrap();

    assert_eq!(
        fs.list_files(),
        [PathBuf::from("/ws/solo").join(CONFIG_FILE)]
    );
}
