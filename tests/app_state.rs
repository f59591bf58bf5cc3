use std::path::PathBuf;

use hunk::pane::SerializedItem;
use hunk::state::{AppState, AppStateStore};

#[test]
fn app_state_defaults_to_no_project_and_no_items() {
    let state = AppState::default();
    assert_eq!(state.last_project_path, None);
    assert!(state.open_items.is_empty());
}

#[test]
fn app_state_parses_without_fields() {
    let state: AppState = toml::from_str("").expect("state without fields should parse");
    assert_eq!(state, AppState::default());
}

#[test]
fn app_state_round_trips_open_items() {
    let state = AppState {
        last_project_path: Some(PathBuf::from("/tmp/hunk-repo")),
        open_items: vec![
            SerializedItem {
                uri: "hunk://file-patch/src%2Fmain.rs/staged?amending".to_string(),
                deserializer: "FilePatchItem".to_string(),
            },
            SerializedItem {
                uri: "hunk://file-patch/README.md/unstaged".to_string(),
                deserializer: "FilePatchItem".to_string(),
            },
        ],
    };

    let raw = toml::to_string(&state).expect("state should serialize");
    let loaded: AppState = toml::from_str(&raw).expect("state should deserialize");

    assert_eq!(loaded, state);
}

#[test]
fn store_saves_and_loads_state_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let store = AppStateStore::at(dir.path().join("nested").join("state.toml"));

    assert_eq!(
        store.load_or_default().expect("missing state should load"),
        AppState::default()
    );

    let state = AppState {
        last_project_path: None,
        open_items: vec![SerializedItem {
            uri: "hunk://file-patch/a.txt/unstaged".to_string(),
            deserializer: "FilePatchItem".to_string(),
        }],
    };
    store.save(&state).expect("state should save");

    let loaded = store.load_or_default().expect("saved state should load");
    assert_eq!(loaded, state);
}

#[test]
fn store_reports_invalid_state_file() {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("state.toml");
    std::fs::write(&path, "open_items = 3").expect("state file should be written");

    let err = AppStateStore::at(&path)
        .load_or_default()
        .expect_err("malformed state should not load");
    assert!(err.to_string().contains("failed to parse TOML state file"));
}
