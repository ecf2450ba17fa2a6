//! Property-based tests for drop-target resolution and drag outcomes

use std::rc::Rc;

use boxgrid_core::{
    AlwaysConfirm, Container, ContainerTree, DragController, DragOutcome, DropMetrics,
    DropThresholds, GridRect, InteractionSurface, Item, MemoryItemStore, MemoryPersistence,
    NeverConfirm, PointerPosition, ROOT_NAME, RecordingSurface, RevertReason,
    intersection_over_union, resolve_drop_target,
};
use proptest::prelude::*;

use super::common::{child_name, rect_strategy, sibling_layout, tree_from, validator};

const CELL: f64 = 10.0;

fn controller() -> DragController {
    DragController::new(validator(), DropThresholds::default(), CELL, 2.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// IoU of a rectangle with itself is one.
    #[test]
    fn prop_iou_identity(a in rect_strategy()) {
        prop_assert!((intersection_over_union(&a, &a) - 1.0).abs() < f64::EPSILON);
    }

    /// IoU is symmetric and lies in [0, 1].
    #[test]
    fn prop_iou_symmetric_and_bounded(a in rect_strategy(), b in rect_strategy()) {
        let ab = intersection_over_union(&a, &b);
        let ba = intersection_over_union(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab == 0.0, !a.intersects(&b));
    }

    /// Overlap shares never exceed one and agree with the intersection.
    #[test]
    fn prop_metrics_are_consistent(a in rect_strategy(), b in rect_strategy()) {
        let m = DropMetrics::between(&a, &b);
        prop_assert!(m.overlap_dragged <= 1.0 && m.overlap_target <= 1.0);
        prop_assert_eq!(m.dragged_area, a.area());
        prop_assert_eq!(m.candidate_area, b.area());
        let inter = a.intersection_area(&b) as f64;
        prop_assert!((m.overlap_dragged - inter / a.area() as f64).abs() < 1e-12);
    }

    /// The resolved target is always a sibling, never the dragged container.
    #[test]
    fn prop_target_is_a_sibling(rects in sibling_layout(), pick in 0usize..12, at in rect_strategy()) {
        let tree = tree_from(&rects, &[]);
        let name = child_name(pick % rects.len());
        if let Some(candidate) = resolve_drop_target(&tree, &name, &at, &DropThresholds::default()) {
            prop_assert_ne!(&candidate.name, &name);
            prop_assert_eq!(
                tree.find_parent_of(&candidate.name).map(|p| p.name.as_str()),
                Some(ROOT_NAME)
            );
            prop_assert!(candidate.metrics.is_acceptable(&DropThresholds::default()));
        }
    }

    /// Any release leaves a valid tree, and a reverted drop leaves it as it was.
    #[test]
    fn prop_drop_keeps_tree_valid(
        rects in sibling_layout(),
        leaves in prop::collection::vec(any::<bool>(), 12),
        pick in 0usize..12,
        dx in -120.0..120.0f64,
        dy in -80.0..80.0f64,
    ) {
        let original = tree_from(&rects, &leaves);
        let mut tree = original.clone();
        let name = child_name(pick % rects.len());
        let mut gateway = MemoryPersistence::new(validator());
        let mut items = MemoryItemStore::new();
        let surface: Rc<dyn InteractionSurface> = Rc::new(RecordingSurface::new());
        let mut drag = controller();
        drag.begin(&tree, &name, PointerPosition::default(), &surface, Default::default())
            .unwrap();
        let outcome = drag
            .finish(&mut tree, PointerPosition::new(dx, dy), &AlwaysConfirm, &mut gateway, &mut items)
            .unwrap();

        prop_assert!(
            tree.validate(&validator()).is_ok(),
            "invalid tree after {:?}: {:?}",
            outcome,
            tree.validate(&validator())
        );
        match outcome {
            DragOutcome::Reverted { .. } | DragOutcome::Unchanged { .. } => {
                prop_assert_eq!(tree, original);
            }
            _ => {
                prop_assert_eq!(gateway.staged_tree(), Some(tree));
            }
        }
    }

    /// Declining a confirmation never changes anything. Only drops onto a
    /// target ask; a free move onto a sibling reverts for overlap instead.
    #[test]
    fn prop_declined_drop_is_reverted(
        rects in sibling_layout(),
        pick in 0usize..12,
        dx in -120.0..120.0f64,
        dy in -80.0..80.0f64,
    ) {
        let original = tree_from(&rects, &[]);
        let mut tree = original.clone();
        let name = child_name(pick % rects.len());
        let mut gateway = MemoryPersistence::new(validator());
        let mut items = MemoryItemStore::new();
        let surface: Rc<dyn InteractionSurface> = Rc::new(RecordingSurface::new());
        let mut drag = controller();
        drag.begin(&tree, &name, PointerPosition::default(), &surface, Default::default())
            .unwrap();
        let release = PointerPosition::new(dx, dy);
        drag.pointer_moved(release).unwrap();
        let cell = drag.preview_cell().unwrap();
        let size = tree.find_by_name(&name).unwrap().size;
        let landing = GridRect::from_parts(cell, size);
        let target = resolve_drop_target(&tree, &name, &landing, &DropThresholds::default());

        let outcome = drag
            .finish(&mut tree, release, &NeverConfirm, &mut gateway, &mut items)
            .unwrap();
        if target.is_some() {
            prop_assert!(
                matches!(&outcome, DragOutcome::Reverted { reason: RevertReason::Declined, .. }),
                "drop on a target was not declined: {:?}",
                outcome
            );
        } else if let DragOutcome::Reverted { reason, .. } = &outcome {
            prop_assert!(
                matches!(reason, RevertReason::Overlap(_)),
                "free move reverted for {:?}",
                reason
            );
        }
        if !matches!(outcome, DragOutcome::Moved { .. }) {
            prop_assert_eq!(tree, original);
        }
    }
}

/// Scenario: a 2×2 box dropped fully inside an empty 4×4 box is accepted
/// through the overlap shares even though IoU is only 0.25.
#[test]
fn small_box_inside_large_box_reparents() {
    let mut tree = ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(12, 8)
            .with_child(Container::new("Small").at(8, 0).sized(2, 2))
            .with_child(Container::new("Large").sized(4, 4)),
    );
    let metrics = DropMetrics::between(&GridRect::new(1, 1, 2, 2), &GridRect::new(0, 0, 4, 4));
    assert!((metrics.iou - 0.25).abs() < 1e-12);
    assert!(metrics.is_acceptable(&DropThresholds::default()));

    let mut gateway = MemoryPersistence::new(validator());
    let mut items = MemoryItemStore::new();
    let surface: Rc<dyn InteractionSurface> = Rc::new(RecordingSurface::new());
    let mut drag = controller();
    drag.begin(&tree, "Small", PointerPosition::new(85.0, 5.0), &surface, Default::default())
        .unwrap();
    // Move by (-70, +10): the box snaps to (1, 1).
    let outcome = drag
        .finish(&mut tree, PointerPosition::new(15.0, 15.0), &AlwaysConfirm, &mut gateway, &mut items)
        .unwrap();

    assert!(matches!(outcome, DragOutcome::Reparented { ref new_parent, .. } if new_parent == "Large"));
    let moved = tree.find_by_name("Small").unwrap();
    assert_eq!(moved.depth, 2);
    assert_eq!(moved.rect(), GridRect::new(0, 0, 2, 2));
    assert_eq!(tree.find_parent_of("Small").unwrap().name, "Large");
}

/// A 1×1 box on a 4×4 box covers too little of the target.
#[test]
fn tiny_box_on_large_box_is_not_a_target() {
    let metrics = DropMetrics::between(&GridRect::new(0, 0, 1, 1), &GridRect::new(0, 0, 4, 4));
    assert!((metrics.overlap_dragged - 1.0).abs() < f64::EPSILON);
    assert!((metrics.overlap_target - 0.0625).abs() < 1e-12);
    assert!(!metrics.is_acceptable(&DropThresholds::default()));
}

/// Scenario: merging two item containers sums colliding quantities.
#[test]
fn merging_item_containers_sums_quantities() {
    let mut tree = ContainerTree::new(
        Container::new(ROOT_NAME)
            .sized(12, 8)
            .with_child(Container::item_leaf("BinA").at(6, 0).sized(2, 2))
            .with_child(Container::item_leaf("BinB").sized(2, 2)),
    );
    let mut gateway = MemoryPersistence::new(validator());
    let store = MemoryItemStore::new();
    store.insert("BinA", vec![Item::new("A", 2), Item::new("B", 1)]);
    store.insert("BinB", vec![Item::new("A", 3)]);
    let mut items = store.clone();
    let surface: Rc<dyn InteractionSurface> = Rc::new(RecordingSurface::new());
    let mut drag = controller();

    drag.begin(&tree, "BinA", PointerPosition::new(60.0, 0.0), &surface, Default::default())
        .unwrap();
    let outcome = drag
        .finish(&mut tree, PointerPosition::new(0.0, 0.0), &AlwaysConfirm, &mut gateway, &mut items)
        .unwrap();

    assert_eq!(
        outcome,
        DragOutcome::Merged {
            source: "BinA".to_string(),
            target: "BinB".to_string(),
            items: 2,
        }
    );
    assert!(!tree.contains("BinA"));
    assert!(!store.contains("BinA"));
    assert_eq!(
        store.get("BinB"),
        Some(vec![Item::new("A", 5), Item::new("B", 1)])
    );
}
