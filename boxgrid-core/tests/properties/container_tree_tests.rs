//! Property-based tests for the container tree

use boxgrid_core::{Container, ContainerTree, GridPoint, LayoutError, ROOT_NAME, adjust_depth};
use proptest::prelude::*;

use super::common::{child_name, sibling_layout, tree_from, validator};

/// A straight chain Root > N0 > N1 > ... of the given length.
fn chain(length: usize) -> ContainerTree {
    let mut node: Option<Container> = None;
    for i in (0..length).rev() {
        let mut current = Container::new(format!("N{i}"));
        if let Some(inner) = node.take() {
            current = current.with_child(inner);
        }
        node = Some(current);
    }
    let mut root = Container::new(ROOT_NAME).sized(4, 4);
    if let Some(top) = node {
        root = root.with_child(top);
    }
    ContainerTree::new(root)
}

fn node_name(k: usize) -> String {
    if k == 0 {
        ROOT_NAME.to_string()
    } else {
        format!("N{k}")
    }
}

/// Node `k + 1` hangs under node `parents[k]`; node 0 is the root.
fn tree_from_parents(parents: &[usize]) -> ContainerTree {
    let mut tree = ContainerTree::new(Container::new(ROOT_NAME).sized(4, 4));
    for (k, &parent) in parents.iter().enumerate() {
        tree.attach(&node_name(parent), Container::new(node_name(k + 1))).unwrap();
    }
    tree
}

/// Walks up from `k` through the parent table looking for `upper`.
fn lies_below(parents: &[usize], upper: usize, mut k: usize) -> bool {
    while k != 0 {
        k = parents[k - 1];
        if k == upper {
            return true;
        }
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Depth equals the number of ancestors for every container.
    #[test]
    fn prop_depth_matches_ancestry(length in 1usize..8) {
        let tree = chain(length);
        for name in tree.names() {
            let node = tree.find_by_name(&name).unwrap();
            let ancestors = tree.ancestors_of(&name).unwrap();
            prop_assert_eq!(node.depth as usize, ancestors.len());
        }
        prop_assert!(tree.validate(&validator()).is_ok());
    }

    /// A node is a descendant of exactly the nodes above it in the chain.
    #[test]
    fn prop_descendant_relation_follows_chain(length in 2usize..8, a in 0usize..8, b in 0usize..8) {
        let a = a % length;
        let b = b % length;
        let tree = chain(length);
        let expected = a > b;
        let na = format!("N{a}");
        let nb = format!("N{b}");
        prop_assert_eq!(tree.is_descendant_of(&na, &nb), expected);
        prop_assert!(tree.is_descendant_of(&na, ROOT_NAME));
        prop_assert!(!tree.is_descendant_of(ROOT_NAME, &na));
    }

    /// Detaching and re-attaching a child keeps the container count and
    /// leaves a valid tree.
    #[test]
    fn prop_detach_attach_preserves_tree(rects in sibling_layout(), pick in 0usize..12) {
        let mut tree = tree_from(&rects, &[]);
        let count = tree.container_count();
        let name = child_name(pick % rects.len());
        let node = tree.detach(&name).unwrap();
        prop_assert_eq!(tree.container_count(), count - 1);
        prop_assert!(!tree.contains(&name));
        tree.attach(ROOT_NAME, node).unwrap();
        prop_assert_eq!(tree.container_count(), count);
        prop_assert!(tree.validate(&validator()).is_ok());
    }

    /// Attaching a subtree rebases every depth under the new parent.
    #[test]
    fn prop_attach_rebases_depth(length in 2usize..7) {
        let mut tree = chain(length);
        let mut moved = tree.detach("N1").unwrap();
        moved.position = GridPoint::new(1, 0);
        tree.attach(ROOT_NAME, moved).unwrap();
        prop_assert_eq!(tree.find_by_name("N1").unwrap().depth, 1);
        for i in 2..length {
            prop_assert_eq!(tree.find_by_name(&format!("N{i}")).unwrap().depth as usize, i);
        }
        prop_assert!(tree.validate(&validator()).is_ok());
    }

    /// Moving a node under itself or anything below it is refused and leaves
    /// the tree untouched, whatever the tree looks like. Every other move
    /// lands under the requested parent with rebased depths.
    #[test]
    fn prop_reparent_refuses_cycles(
        raw in prop::collection::vec(any::<usize>(), 1..10),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let parents: Vec<usize> = raw.iter().enumerate().map(|(k, r)| r % (k + 1)).collect();
        let nodes = parents.len() + 1;
        let (a, b) = (a % nodes, b % nodes);
        let mut tree = tree_from_parents(&parents);
        let before = tree.clone();
        let (moved, target) = (node_name(a), node_name(b));

        let result = tree.reparent(&moved, &target);
        if a == b || lies_below(&parents, a, b) {
            prop_assert_eq!(
                result,
                Err(LayoutError::CycleViolation { dragged: moved, target })
            );
            prop_assert_eq!(&tree, &before);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(tree.container_count(), nodes);
            let parent = tree.find_parent_of(&moved).unwrap();
            prop_assert_eq!(&parent.name, &target);
            let parent_depth = parent.depth;
            let node = tree.find_by_name(&moved).unwrap();
            prop_assert_eq!(node.depth, parent_depth + 1);
            prop_assert_eq!(node.position, GridPoint::ORIGIN);
            for name in tree.names() {
                let depth = tree.find_by_name(&name).unwrap().depth as usize;
                prop_assert_eq!(depth, tree.ancestors_of(&name).unwrap().len());
            }
        }
    }

    /// Names stay unique: attaching any existing name again fails.
    #[test]
    fn prop_duplicate_names_rejected(rects in sibling_layout(), pick in 0usize..12) {
        let mut tree = tree_from(&rects, &[]);
        let name = child_name(pick % rects.len());
        let result = tree.attach(ROOT_NAME, Container::new(name.clone()));
        prop_assert_eq!(result, Err(LayoutError::DuplicateName(name)));
    }

    /// Depth adjustment never goes below zero.
    #[test]
    fn prop_adjust_depth_saturates(start in 0u32..5, delta in -10i64..10) {
        let mut node = Container::new("X").with_child(Container::new("Y"));
        adjust_depth(&mut node, i64::from(start));
        adjust_depth(&mut node, delta);
        let expected = (i64::from(start) + delta).max(0);
        prop_assert_eq!(i64::from(node.depth), expected);
        prop_assert_eq!(i64::from(node.children[0].depth), (i64::from(start) + 1 + delta).max(0));
    }
}

#[test]
fn rename_keeps_structure() {
    let mut tree = chain(3);
    tree.rename("N1", "Middle").unwrap();
    assert!(tree.is_descendant_of("N2", "Middle"));
    assert_eq!(tree.find_parent_of("Middle").unwrap().name, "N0");
    assert_eq!(
        tree.rename("N0", "N2"),
        Err(LayoutError::DuplicateName("N2".to_string()))
    );
}

#[test]
fn root_cannot_be_detached() {
    let mut tree = chain(1);
    assert!(tree.detach(ROOT_NAME).is_err());
}
