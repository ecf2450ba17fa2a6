//! Integration tests for the layout editor over on-disk storage

use std::rc::Rc;

use boxgrid_core::{
    AlwaysConfirm, BoxGridError, ConfigManager, ConfirmWith, Container, DragOutcome, DropAction,
    FileItemStore, GridPoint, InteractionOutcome, InteractionSurface, Item, ItemStore, LayoutEditor,
    LayoutError, PointerFeedback, PointerPosition, ROOT_NAME, RecordingSurface, ResizeHandle,
    ResizeOutcome, STAGED_FILE,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> LayoutEditor {
    let config = ConfigManager::with_config_dir(dir.path().to_path_buf());
    LayoutEditor::open(&config).unwrap()
}

fn cell(editor: &LayoutEditor) -> f64 {
    editor.settings().pointer.cell_px
}

#[test]
fn test_fresh_directory_starts_with_single_cell() {
    let dir = TempDir::new().unwrap();
    let editor = open(&dir);
    assert_eq!(editor.tree().container_count(), 1);
    assert_eq!(editor.tree().root().name, ROOT_NAME);
    assert!(!editor.has_staged_changes());
}

#[test]
fn test_edits_survive_reopen_only_after_commit() {
    let dir = TempDir::new().unwrap();
    {
        let mut editor = open(&dir);
        editor.add_box(ROOT_NAME, Container::new("Shelf").sized(4, 2)).unwrap();
        assert!(dir.path().join(STAGED_FILE).exists());
    }
    {
        // The staged copy is picked up on reopen.
        let mut editor = open(&dir);
        assert!(editor.tree().contains("Shelf"));
        editor.revert_staged().unwrap();
        assert!(!editor.tree().contains("Shelf"));
        editor.add_box(ROOT_NAME, Container::new("Drawer")).unwrap();
        editor.commit().unwrap();
    }
    let editor = open(&dir);
    assert!(editor.tree().contains("Drawer"));
    assert!(!editor.has_staged_changes());
}

#[test]
fn test_add_at_extreme_position_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    for container in [
        Container::new("A").at(i32::MAX, 0),
        Container::new("A").at(0, i32::MAX),
        Container::new("A").at(1, 0).sized(i32::MAX, 1),
    ] {
        let err = editor.add_box(ROOT_NAME, container).unwrap_err();
        assert!(matches!(
            err,
            BoxGridError::Layout(LayoutError::BoundsViolation { .. })
        ));
    }
    assert_eq!(editor.tree().container_count(), 1);
    assert!(!editor.has_staged_changes());
}

#[test]
fn test_reparent_rejects_moves_into_own_subtree() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    editor.add_box(ROOT_NAME, Container::new("Shelf").sized(2, 2)).unwrap();
    editor.add_box(ROOT_NAME, Container::new("Drawer").at(4, 0).sized(4, 4)).unwrap();
    editor.add_box("Drawer", Container::new("Tray").sized(2, 1)).unwrap();
    editor.commit().unwrap();

    let position = editor.reparent("Shelf", "Drawer").unwrap();
    assert_eq!(position, GridPoint::ORIGIN);
    assert_eq!(editor.tree().find_by_name("Tray").unwrap().position.x, 2);
    assert_eq!(editor.tree().find_parent_of("Shelf").unwrap().name, "Drawer");
    assert_eq!(editor.tree().find_by_name("Shelf").unwrap().depth, 2);
    assert!(editor.has_staged_changes());

    let before = editor.tree().clone();
    for (name, target) in [("Drawer", "Shelf"), ("Drawer", "Drawer"), (ROOT_NAME, "Tray")] {
        let err = editor.reparent(name, target).unwrap_err();
        assert!(matches!(
            err,
            BoxGridError::Layout(LayoutError::CycleViolation { .. })
        ));
        assert_eq!(editor.tree(), &before);
    }
    drop(editor);
    assert_eq!(open(&dir).tree(), &before);
}

#[test]
fn test_settings_file_shapes_the_grid() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.toml"),
        "[grid]\nmax_width = 4\nmax_height = 4\n",
    )
    .unwrap();
    let mut editor = open(&dir);
    let err = editor
        .add_box(ROOT_NAME, Container::new("Wide").sized(5, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        BoxGridError::Layout(LayoutError::BoundsViolation { .. })
    ));
    assert!(!editor.tree().contains("Wide"));
}

#[test]
fn test_resize_chain_through_editor() {
    let dir = TempDir::new().unwrap();
    let recorder = Rc::new(RecordingSurface::new());
    let surface: Rc<dyn InteractionSurface> = recorder.clone();
    let mut editor = open(&dir).with_surface(surface);
    editor.add_box(ROOT_NAME, Container::new("A").sized(2, 2)).unwrap();
    editor.add_box(ROOT_NAME, Container::new("B").at(2, 0).sized(2, 2)).unwrap();
    editor.add_box(ROOT_NAME, Container::new("C").at(4, 0).sized(2, 2)).unwrap();
    let px = cell(&editor);

    editor
        .press_resize_handle("A", ResizeHandle::Right, PointerPosition::new(0.0, 0.0))
        .unwrap();
    assert_eq!(recorder.captured().len(), 1);
    let feedback = editor
        .pointer_moved(PointerPosition::new(2.0 * px, 0.0))
        .unwrap();
    assert!(matches!(feedback, PointerFeedback::Resize(_)));
    let outcome = editor
        .pointer_released(PointerPosition::new(2.0 * px, 0.0), &AlwaysConfirm)
        .unwrap();

    match outcome {
        InteractionOutcome::Resize(ResizeOutcome::Committed { size, displaced, .. }) => {
            assert_eq!(size.width, 4);
            assert_eq!(displaced.len(), 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(editor.tree().find_by_name("B").unwrap().position.x, 4);
    assert_eq!(editor.tree().find_by_name("C").unwrap().position.x, 6);
    assert!(recorder.is_quiet());

    // What was staged on disk is what the editor shows.
    let reopened = open(&dir);
    assert_eq!(reopened.tree(), editor.tree());
}

#[test]
fn test_merge_through_editor_moves_items_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    editor
        .add_box(ROOT_NAME, Container::item_leaf("BinA").at(4, 0).sized(2, 2))
        .unwrap();
    editor
        .add_box(ROOT_NAME, Container::item_leaf("BinB").sized(2, 2))
        .unwrap();
    editor
        .set_items("BinA", &[Item::new("A", 2), Item::new("B", 1)])
        .unwrap();
    editor.set_items("BinB", &[Item::new("A", 3)]).unwrap();
    let px = cell(&editor);

    let asked = std::cell::RefCell::new(Vec::new());
    let confirm = ConfirmWith(|action: &DropAction<'_>| {
        asked.borrow_mut().push(action.to_string());
        true
    });
    editor
        .press_container("BinA", PointerPosition::new(4.0 * px, 0.0))
        .unwrap();
    let outcome = editor
        .pointer_released(PointerPosition::new(0.0, 0.0), &confirm)
        .unwrap();

    assert!(matches!(
        outcome,
        InteractionOutcome::Drag(DragOutcome::Merged { items: 2, .. })
    ));
    assert_eq!(asked.borrow().len(), 1);
    assert!(!editor.tree().contains("BinA"));
    assert!(editor.handles().get("BinA").is_none());
    assert_eq!(
        editor.items("BinB").unwrap(),
        vec![Item::new("A", 5), Item::new("B", 1)]
    );
    let store = FileItemStore::new(dir.path());
    assert!(!store.path_for("BinA").exists());
    assert!(store.load_items("BinA").unwrap().is_empty());
}

#[test]
fn test_rename_carries_items_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    editor.add_box(ROOT_NAME, Container::item_leaf("Bin")).unwrap();
    editor.set_items("Bin", &[Item::new("washer", 9)]).unwrap();
    editor.rename("Bin", "Washers").unwrap();

    let store = FileItemStore::new(dir.path());
    assert_eq!(
        store.load_items("Washers").unwrap(),
        vec![Item::new("washer", 9)]
    );
    assert!(!store.path_for("Bin").exists());
}

#[test]
fn test_cancel_restores_layout() {
    let dir = TempDir::new().unwrap();
    let mut editor = open(&dir);
    editor.add_box(ROOT_NAME, Container::new("A").sized(2, 2)).unwrap();
    editor.add_box(ROOT_NAME, Container::new("B").at(2, 0).sized(2, 2)).unwrap();
    let before = editor.tree().clone();
    let px = cell(&editor);

    editor
        .press_resize_handle("A", ResizeHandle::BottomRight, PointerPosition::default())
        .unwrap();
    editor
        .pointer_moved(PointerPosition::new(px, px))
        .unwrap();
    assert_ne!(editor.tree(), &before);
    assert!(editor.cancel_interaction());
    assert_eq!(editor.tree(), &before);
    assert!(matches!(
        editor.pointer_moved(PointerPosition::default()),
        Err(BoxGridError::Layout(LayoutError::NoActiveInteraction))
    ));
}
