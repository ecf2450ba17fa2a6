//! Integration tests for file-backed layout and item persistence

use boxgrid_core::{
    COMMITTED_FILE, Container, ContainerTree, FileItemStore, FilePersistence, ITEMS_DIR, Item,
    ItemStore, LAYOUT_FORMAT_VERSION, LayoutDocument, LayoutValidator, PersistenceError,
    PersistenceGateway, ROOT_NAME, STAGED_FILE,
};
use tempfile::TempDir;

fn sample_tree() -> ContainerTree {
    ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(12, 8)
            .with_child(
                Container::new("Shelf")
                    .with_kind("shelf")
                    .sized(6, 4)
                    .with_child(
                        Container::item_leaf("Screws")
                            .with_kind("bin")
                            .with_category("hardware")
                            .sized(2, 2),
                    )
                    .with_child(Container::item_leaf("Nails").at(2, 0).sized(2, 2)),
            )
            .with_child(Container::new("Drawer").at(6, 0).with_color("#336699")),
    )
}

// ============================================================================
// Layout documents
// ============================================================================

#[test]
fn test_document_json_shape() {
    let json = LayoutDocument::from_tree(&sample_tree()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["formatVersion"], LAYOUT_FORMAT_VERSION);
    assert!(value["savedAt"].is_string());
    let shelf = &value["root"]["children"][0];
    assert_eq!(shelf["name"], "Shelf");
    assert_eq!(shelf["type"], "shelf");
    assert_eq!(shelf["depth"], 1);
    assert_eq!(shelf["size"], serde_json::json!([6, 4]));
    assert_eq!(value["root"]["children"][1]["position"], serde_json::json!([6, 0]));
    let screws = &shelf["children"][0];
    assert_eq!(screws["isItemLeaf"], true);
    assert_eq!(screws["depth"], 2);
    assert_eq!(screws["allowedCategories"][0], "hardware");
}

#[test]
fn test_document_without_version_is_accepted() {
    let text = r#"{
        "savedAt": "2026-01-01T00:00:00Z",
        "root": { "name": "Root", "size": [2, 2] }
    }"#;
    let tree = LayoutDocument::decode(text, &LayoutValidator::default()).unwrap();
    assert_eq!(tree.root().name, "Root");
    assert_eq!(tree.container_count(), 1);
}

#[test]
fn test_document_from_future_version_is_rejected() {
    let text = r#"{
        "formatVersion": 99,
        "savedAt": "2026-01-01T00:00:00Z",
        "root": { "name": "Root" }
    }"#;
    assert!(matches!(
        LayoutDocument::decode(text, &LayoutValidator::default()),
        Err(PersistenceError::MalformedPersistedState(_))
    ));
}

#[test]
fn test_document_with_wrong_depth_is_rejected() {
    let text = r#"{
        "savedAt": "2026-01-01T00:00:00Z",
        "root": {
            "name": "Root",
            "children": [ { "name": "A", "depth": 3 } ]
        }
    }"#;
    assert!(matches!(
        LayoutDocument::decode(text, &LayoutValidator::default()),
        Err(PersistenceError::MalformedPersistedState(_))
    ));
}

// ============================================================================
// Staged / committed files
// ============================================================================

#[test]
fn test_stage_commit_revert_cycle() {
    let dir = TempDir::new().unwrap();
    let mut gateway = FilePersistence::new(dir.path(), LayoutValidator::default());

    gateway.save_staged(&sample_tree()).unwrap();
    assert!(dir.path().join(STAGED_FILE).exists());
    assert!(!dir.path().join(COMMITTED_FILE).exists());
    assert_eq!(gateway.load(), sample_tree());

    gateway.commit(&sample_tree()).unwrap();
    assert!(!dir.path().join(STAGED_FILE).exists());
    assert!(dir.path().join(COMMITTED_FILE).exists());

    let mut edited = sample_tree();
    edited.detach("Drawer").unwrap();
    gateway.save_staged(&edited).unwrap();
    assert_eq!(gateway.load(), edited);

    gateway.revert().unwrap();
    assert_eq!(gateway.load(), sample_tree());
}

#[test]
fn test_overlapping_staged_file_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut gateway = FilePersistence::new(dir.path(), LayoutValidator::default());
    gateway.commit(&sample_tree()).unwrap();

    let mut broken = sample_tree();
    broken.find_by_name_mut("Drawer").unwrap().position.x = 0;
    let json = LayoutDocument::from_tree(&broken).to_json().unwrap();
    std::fs::write(gateway.staged_path(), json).unwrap();

    assert_eq!(gateway.load(), sample_tree());
}

#[test]
fn test_staged_file_with_huge_position_is_ignored() {
    let dir = TempDir::new().unwrap();
    let mut gateway = FilePersistence::new(dir.path(), LayoutValidator::default());
    gateway.commit(&sample_tree()).unwrap();

    let mut far_away = sample_tree();
    far_away.find_by_name_mut("Drawer").unwrap().position.x = i32::MAX;
    let json = LayoutDocument::from_tree(&far_away).to_json().unwrap();
    assert!(json.contains("2147483647"));
    std::fs::write(gateway.staged_path(), json).unwrap();

    let loaded = gateway.load();
    assert_eq!(loaded, sample_tree());
    assert_eq!(loaded.find_by_name("Drawer").unwrap().position.x, 6);
}

#[test]
fn test_both_files_unusable_yields_single_cell() {
    let dir = TempDir::new().unwrap();
    let gateway = FilePersistence::new(dir.path(), LayoutValidator::default());
    std::fs::write(gateway.staged_path(), "[]").unwrap();
    std::fs::write(gateway.committed_path(), "{}").unwrap();
    assert_eq!(gateway.load(), ContainerTree::single_cell());
}

// ============================================================================
// Item lists
// ============================================================================

#[test]
fn test_item_files_live_under_items_dir() {
    let dir = TempDir::new().unwrap();
    let mut store = FileItemStore::new(dir.path());
    store
        .save_items("Screws", &[Item::new("m3", 100), Item::new("m4", 50)])
        .unwrap();

    let path = store.path_for("Screws");
    assert!(path.starts_with(dir.path().join(ITEMS_DIR)));
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value[0]["id"], "m3");
    assert_eq!(value[0]["qty"], 100);
}

#[test]
fn test_item_names_with_separators_stay_inside_store() {
    let dir = TempDir::new().unwrap();
    let mut store = FileItemStore::new(dir.path());
    let name = "../../etc/passwd";
    store.save_items(name, &[Item::new("x", 1)]).unwrap();
    assert_eq!(store.path_for(name).parent(), Some(store.dir()));
    assert_eq!(store.stored_names().unwrap(), vec![name.to_string()]);
}
