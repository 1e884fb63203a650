//! Hierarchy helpers: forest construction from flat parent references,
//! write-time cycle detection and depth computation.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::types::DbId;

/// Read access the tree builder needs from a hierarchical entity.
pub trait TreeItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn position(&self) -> i32;
}

/// A node in the category forest.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    pub category: T,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

impl<T: TreeItem> TreeNode<T> {
    /// Ids of this subtree in depth-first pre-order.
    pub fn ids(&self) -> Vec<DbId> {
        let mut out = Vec::with_capacity(self.size());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<DbId>) {
        out.push(self.category.id());
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}

/// Result of building a forest.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    pub roots: Vec<TreeNode<T>>,
    /// Ids that sat on a parent cycle and were promoted to the root level.
    pub cyclic_ids: Vec<DbId>,
}

struct Builder<'a, T> {
    items: &'a [T],
    children: HashMap<DbId, Vec<usize>>,
    visited: HashSet<usize>,
}

impl<T: TreeItem + Clone> Builder<'_, T> {
    fn attach(&mut self, idx: usize) -> TreeNode<T> {
        self.visited.insert(idx);
        let child_idxs = self
            .children
            .get(&self.items[idx].id())
            .cloned()
            .unwrap_or_default();

        let mut children = Vec::with_capacity(child_idxs.len());
        for child in child_idxs {
            if !self.visited.contains(&child) {
                children.push(self.attach(child));
            }
        }

        TreeNode {
            category: self.items[idx].clone(),
            children,
        }
    }
}

fn sibling_order<T: TreeItem>(items: &[T], idxs: &mut [usize]) {
    idxs.sort_by_key(|&i| (items[i].position(), items[i].id(), i));
}

/// Build a forest from a flat list.
///
/// Roots are items without a parent or whose parent is absent from the
/// input. Siblings are ordered by `position`, then `id`. Items that are
/// unreachable from any root (they sit on a parent cycle) are emitted as
/// extra roots and reported in [`Forest::cyclic_ids`]; every input item
/// appears exactly once.
pub fn build_forest<T: TreeItem + Clone>(items: &[T]) -> Forest<T> {
    let present: HashSet<DbId> = items.iter().map(TreeItem::id).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<DbId, Vec<usize>> = HashMap::new();
    for (idx, item) in items.iter().enumerate() {
        match item.parent_id() {
            Some(parent) if present.contains(&parent) => {
                children.entry(parent).or_default().push(idx);
            }
            _ => roots.push(idx),
        }
    }

    sibling_order(items, &mut roots);
    for siblings in children.values_mut() {
        sibling_order(items, siblings);
    }

    let mut builder = Builder {
        items,
        children,
        visited: HashSet::with_capacity(items.len()),
    };

    let mut forest: Vec<TreeNode<T>> = roots.into_iter().map(|i| builder.attach(i)).collect();

    let mut stranded: Vec<usize> = (0..items.len())
        .filter(|i| !builder.visited.contains(i))
        .collect();
    sibling_order(items, &mut stranded);

    let mut cyclic_ids = Vec::new();
    for idx in stranded {
        if builder.visited.contains(&idx) {
            continue;
        }
        cyclic_ids.push(items[idx].id());
        forest.push(builder.attach(idx));
    }

    if !cyclic_ids.is_empty() {
        tracing::error!(
            cyclic_ids = ?cyclic_ids,
            "Parent cycle found while building category tree"
        );
    }

    Forest {
        roots: forest,
        cyclic_ids,
    }
}

/// Build a forest and return only its roots.
pub fn build_tree<T: TreeItem + Clone>(items: &[T]) -> Vec<TreeNode<T>> {
    build_forest(items).roots
}

/// Drop every node rejected by `keep`, together with its subtree.
pub fn prune<T>(nodes: Vec<TreeNode<T>>, keep: &impl Fn(&T) -> bool) -> Vec<TreeNode<T>> {
    nodes
        .into_iter()
        .filter(|node| keep(&node.category))
        .map(|node| TreeNode {
            children: prune(node.children, keep),
            category: node.category,
        })
        .collect()
}

/// Whether re-parenting `id` under `new_parent` would close a cycle.
///
/// Walks the ancestor chain of `new_parent` via `parent_of`. Chain length is
/// unbounded; an ancestor seen twice means the stored chain is already
/// corrupt and is reported as a cycle as well.
pub fn creates_cycle(
    id: DbId,
    new_parent: Option<DbId>,
    parent_of: impl Fn(DbId) -> Option<DbId>,
) -> bool {
    let mut seen = HashSet::new();
    let mut cursor = new_parent;
    while let Some(current) = cursor {
        if current == id || !seen.insert(current) {
            return true;
        }
        cursor = parent_of(current);
    }
    false
}

/// Depth of a node whose parent is `parent`: 0 for roots, otherwise one
/// more than the number of ancestors. Returns `None` if the chain loops.
pub fn depth_under(parent: Option<DbId>, parent_of: impl Fn(DbId) -> Option<DbId>) -> Option<i32> {
    let mut seen = HashSet::new();
    let mut depth = 0;
    let mut cursor = parent;
    while let Some(current) = cursor {
        if !seen.insert(current) {
            return None;
        }
        depth += 1;
        cursor = parent_of(current);
    }
    Some(depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Node {
        id: DbId,
        parent: Option<DbId>,
        position: i32,
    }

    impl TreeItem for Node {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent
        }
        fn position(&self) -> i32 {
            self.position
        }
    }

    fn node(id: DbId, parent: Option<DbId>, position: i32) -> Node {
        Node {
            id,
            parent,
            position,
        }
    }

    fn all_ids(forest: &[TreeNode<Node>]) -> Vec<DbId> {
        let mut ids: Vec<DbId> = forest.iter().flat_map(TreeNode::ids).collect();
        ids.sort_unstable();
        ids
    }

    fn parent_lookup(nodes: &[Node]) -> impl Fn(DbId) -> Option<DbId> + '_ {
        move |id| nodes.iter().find(|n| n.id == id).and_then(|n| n.parent)
    }

    #[test]
    fn groups_children_under_parents() {
        let nodes = vec![
            node(1, None, 0),
            node(2, Some(1), 0),
            node(3, Some(1), 1),
            node(4, Some(2), 0),
        ];
        let forest = build_tree(&nodes);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].ids(), vec![1, 2, 4, 3]);
    }

    #[test]
    fn siblings_ordered_by_position_then_id() {
        let nodes = vec![
            node(10, None, 2),
            node(7, None, 1),
            node(3, None, 1),
            node(1, None, 5),
        ];
        let roots: Vec<DbId> = build_tree(&nodes).iter().map(|n| n.category.id).collect();
        assert_eq!(roots, vec![3, 7, 10, 1]);
    }

    #[test]
    fn missing_parent_becomes_root() {
        let nodes = vec![node(1, None, 0), node(2, Some(99), 0)];
        let forest = build_tree(&nodes);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn cycle_terminates_and_keeps_every_node_once() {
        // 2 -> 3 -> 4 -> 2, with 5 hanging off 4.
        let nodes = vec![
            node(1, None, 0),
            node(2, Some(4), 0),
            node(3, Some(2), 0),
            node(4, Some(3), 0),
            node(5, Some(4), 1),
        ];
        let forest = build_forest(&nodes);
        assert_eq!(all_ids(&forest.roots), vec![1, 2, 3, 4, 5]);
        assert_eq!(forest.cyclic_ids, vec![2]);
        assert_eq!(forest.roots.len(), 2);
    }

    #[test]
    fn self_parent_terminates() {
        let nodes = vec![node(1, Some(1), 0)];
        let forest = build_forest(&nodes);
        assert_eq!(all_ids(&forest.roots), vec![1]);
        assert_eq!(forest.cyclic_ids, vec![1]);
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = build_forest::<Node>(&[]);
        assert!(forest.roots.is_empty());
        assert!(forest.cyclic_ids.is_empty());
    }

    #[test]
    fn prune_removes_subtrees() {
        let nodes = vec![
            node(1, None, 0),
            node(2, Some(1), 0),
            node(3, Some(2), 0),
            node(4, Some(1), 1),
        ];
        let pruned = prune(build_tree(&nodes), &|n: &Node| n.id != 2);
        assert_eq!(all_ids(&pruned), vec![1, 4]);
    }

    #[test]
    fn cycle_detection_on_reparent() {
        let nodes = vec![node(1, None, 0), node(2, Some(1), 0), node(3, Some(2), 0)];
        let lookup = parent_lookup(&nodes);
        assert!(creates_cycle(1, Some(3), &lookup));
        assert!(creates_cycle(2, Some(2), &lookup));
        assert!(!creates_cycle(3, Some(1), &lookup));
        assert!(!creates_cycle(1, None, &lookup));
    }

    #[test]
    fn depth_counts_ancestors() {
        let nodes = vec![node(1, None, 0), node(2, Some(1), 0), node(3, Some(2), 0)];
        let lookup = parent_lookup(&nodes);
        assert_eq!(depth_under(None, &lookup), Some(0));
        assert_eq!(depth_under(Some(1), &lookup), Some(1));
        assert_eq!(depth_under(Some(3), &lookup), Some(3));
    }

    #[test]
    fn deep_chains_are_neither_cyclic_nor_truncated() {
        let nodes: Vec<Node> = (1..=200)
            .map(|id| node(id, if id == 1 { None } else { Some(id - 1) }, 0))
            .collect();
        let lookup = parent_lookup(&nodes);
        assert_eq!(depth_under(Some(200), &lookup), Some(200));
        assert!(!creates_cycle(201, Some(200), &lookup));
        assert!(creates_cycle(1, Some(200), &lookup));
    }

    #[test]
    fn corrupt_chain_blocks_reparenting() {
        let nodes = vec![node(1, Some(2), 0), node(2, Some(1), 0), node(3, None, 0)];
        assert!(creates_cycle(3, Some(1), parent_lookup(&nodes)));
    }

    #[test]
    fn depth_of_corrupt_chain_is_none() {
        let nodes = vec![node(1, Some(2), 0), node(2, Some(1), 0)];
        assert_eq!(depth_under(Some(1), parent_lookup(&nodes)), None);
    }
}
