//! Property-based tests for chain push/pull resizing

use std::rc::Rc;

use boxgrid_core::{
    Container, ContainerTree, FrameOutcome, GridBounds, GridRect, InteractionSurface,
    LayoutSnapshot, LayoutValidator, MemoryPersistence, NullSurface, PersistenceGateway,
    PointerPosition, ROOT_NAME, RecordingSurface, ResizeController, ResizeHandle, ResizeOutcome,
    propagate_resize,
};
use proptest::prelude::*;

use super::common::{child_name, sibling_layout, tree_from, validator};

const CELL: f64 = 10.0;

fn handle_strategy() -> impl Strategy<Value = ResizeHandle> {
    prop_oneof![
        Just(ResizeHandle::Right),
        Just(ResizeHandle::Bottom),
        Just(ResizeHandle::BottomRight),
    ]
}

fn frames_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-60.0..90.0f64, -60.0..90.0f64), 1..8)
}

fn surface() -> Rc<dyn InteractionSurface> {
    Rc::new(NullSurface)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Whatever the pointer does, every frame leaves the sibling group in
    /// bounds and free of overlap.
    #[test]
    fn prop_frames_keep_layout_valid(
        rects in sibling_layout(),
        pick in 0usize..12,
        handle in handle_strategy(),
        frames in frames_strategy(),
    ) {
        let mut tree = tree_from(&rects, &[]);
        let name = child_name(pick % rects.len());
        let mut controller = ResizeController::new(validator(), CELL);
        controller
            .begin(&tree, &name, handle, PointerPosition::default(), &surface(), Default::default())
            .unwrap();
        for (x, y) in frames {
            controller.update(&mut tree, PointerPosition::new(x, y)).unwrap();
            prop_assert!(
                tree.validate(&validator()).is_ok(),
                "invalid layout after frame ({}, {}): {:?}",
                x,
                y,
                tree.validate(&validator())
            );
        }
    }

    /// Cancelling restores every rectangle captured at press time.
    #[test]
    fn prop_cancel_restores_snapshot(
        rects in sibling_layout(),
        pick in 0usize..12,
        handle in handle_strategy(),
        frames in frames_strategy(),
    ) {
        let original = tree_from(&rects, &[]);
        let mut tree = original.clone();
        let name = child_name(pick % rects.len());
        let mut controller = ResizeController::new(validator(), CELL);
        controller
            .begin(&tree, &name, handle, PointerPosition::default(), &surface(), Default::default())
            .unwrap();
        for (x, y) in frames {
            controller.update(&mut tree, PointerPosition::new(x, y)).unwrap();
        }
        prop_assert!(controller.cancel(&mut tree));
        prop_assert_eq!(tree, original);
        prop_assert!(!controller.is_active());
    }

    /// Pressing and releasing without moving changes nothing and saves nothing.
    #[test]
    fn prop_press_release_is_noop(
        rects in sibling_layout(),
        pick in 0usize..12,
        handle in handle_strategy(),
    ) {
        let original = tree_from(&rects, &[]);
        let mut tree = original.clone();
        let name = child_name(pick % rects.len());
        let mut gateway = MemoryPersistence::new(validator());
        let mut controller = ResizeController::new(validator(), CELL);
        controller
            .begin(&tree, &name, handle, PointerPosition::new(5.0, 5.0), &surface(), Default::default())
            .unwrap();
        controller.update(&mut tree, PointerPosition::new(7.0, 3.0)).unwrap();
        let outcome = controller.finish(&mut tree, &mut gateway).unwrap();
        prop_assert_eq!(outcome, ResizeOutcome::Unchanged { name });
        prop_assert_eq!(tree, original);
        prop_assert_eq!(gateway.save_count(), 0);
        prop_assert!(!gateway.has_staged());
    }

    /// A committed resize is staged exactly as it stands in the tree.
    #[test]
    fn prop_committed_resize_is_staged(
        rects in sibling_layout(),
        pick in 0usize..12,
        handle in handle_strategy(),
        frames in frames_strategy(),
    ) {
        let mut tree = tree_from(&rects, &[]);
        let name = child_name(pick % rects.len());
        let mut gateway = MemoryPersistence::new(validator());
        let mut controller = ResizeController::new(validator(), CELL);
        controller
            .begin(&tree, &name, handle, PointerPosition::default(), &surface(), Default::default())
            .unwrap();
        for (x, y) in frames {
            controller.update(&mut tree, PointerPosition::new(x, y)).unwrap();
        }
        match controller.finish(&mut tree, &mut gateway).unwrap() {
            ResizeOutcome::Committed { .. } => {
                prop_assert_eq!(gateway.staged_tree(), Some(tree));
            }
            ResizeOutcome::Unchanged { .. } => {
                prop_assert_eq!(gateway.save_count(), 0);
            }
            ResizeOutcome::RolledBack { warning, .. } => {
                prop_assert!(false, "unexpected rollback: {}", warning);
            }
        }
    }

    /// Propagation never moves a sibling that lies entirely above and to the
    /// left of the growing container.
    #[test]
    fn prop_push_only_moves_forward(
        rects in sibling_layout(),
        pick in 0usize..12,
        grow_w in 0..4i32,
        grow_h in 0..4i32,
    ) {
        let tree = tree_from(&rects, &[]);
        let name = child_name(pick % rects.len());
        let snapshot = LayoutSnapshot::capture(&tree, &name).unwrap();
        let original = snapshot.rect_of(&name).unwrap();
        let proposed = GridRect::new(
            original.x,
            original.y,
            original.width + grow_w,
            original.height + grow_h,
        );
        if let Ok(placements) = propagate_resize(&snapshot, &name, proposed, validator().bounds()) {
            for (moved, rect) in placements {
                let before = snapshot.rect_of(&moved).unwrap();
                prop_assert!(rect.x >= before.x && rect.y >= before.y);
            }
        }
    }
}

#[test]
fn pushes_neighbour_when_growing() {
    // X at [0,0] 2×2, Y at [2,0] 2×2, ten columns; X grows to width 3.
    let bounds = GridBounds {
        max_width: 10,
        max_height: 8,
        min_size: 1,
    };
    let validator = LayoutValidator::new(bounds);
    let mut tree = ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(10, 8)
            .with_child(Container::new("X").sized(2, 2))
            .with_child(Container::new("Y").at(2, 0).sized(2, 2)),
    );
    let recorder = Rc::new(RecordingSurface::new());
    let surface: Rc<dyn InteractionSurface> = recorder.clone();
    let mut gateway = MemoryPersistence::new(validator);
    let mut controller = ResizeController::new(validator, CELL);

    controller
        .begin(
            &tree,
            "X",
            ResizeHandle::Right,
            PointerPosition::new(20.0, 10.0),
            &surface,
            Default::default(),
        )
        .unwrap();
    assert_eq!(recorder.capture_count(), 1);
    let frame = controller
        .update(&mut tree, PointerPosition::new(30.0, 10.0))
        .unwrap();
    assert!(matches!(frame, FrameOutcome::Applied { ref displaced, .. } if displaced == &["Y"]));
    let outcome = controller.finish(&mut tree, &mut gateway).unwrap();

    assert!(matches!(outcome, ResizeOutcome::Committed { .. }));
    assert_eq!(tree.find_by_name("X").unwrap().rect(), GridRect::new(0, 0, 3, 2));
    assert_eq!(tree.find_by_name("Y").unwrap().rect(), GridRect::new(3, 0, 2, 2));
    assert!(tree.validate(&validator).is_ok());
    assert!(recorder.is_quiet());
    assert_eq!(gateway.staged_tree(), Some(tree));
}

#[test]
fn shrinking_pulls_neighbour_back() {
    let mut tree = ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(12, 8)
            .with_child(Container::new("X").sized(3, 2))
            .with_child(Container::new("Y").at(3, 0).sized(2, 2)),
    );
    let mut controller = ResizeController::new(validator(), CELL);
    controller
        .begin(&tree, "X", ResizeHandle::Right, PointerPosition::default(), &surface(), Default::default())
        .unwrap();
    controller
        .update(&mut tree, PointerPosition::new(-10.0, 0.0))
        .unwrap();
    assert_eq!(tree.find_by_name("X").unwrap().size.width, 2);
    assert_eq!(tree.find_by_name("Y").unwrap().position.x, 2);
}

#[test]
fn overflowing_push_rolls_back_frame() {
    let mut tree = ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(12, 8)
            .with_child(Container::new("X").sized(2, 2))
            .with_child(Container::new("Y").at(2, 0).sized(10, 2)),
    );
    let original = tree.clone();
    let mut controller = ResizeController::new(validator(), CELL);
    controller
        .begin(&tree, "X", ResizeHandle::Right, PointerPosition::default(), &surface(), Default::default())
        .unwrap();
    let frame = controller
        .update(&mut tree, PointerPosition::new(10.0, 0.0))
        .unwrap();
    assert!(matches!(frame, FrameOutcome::RolledBack(_)));
    assert_eq!(tree, original);
    assert!(controller.is_active());
}
