// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with path lookup and count propagation.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::traverse::{Children, Subtree};
use crate::path;

/// One count mutation produced by [`HierarchyTree::change_count`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CountChange {
    /// The node whose count changed.
    pub node: NodeId,
    /// Count before the change.
    pub previous: u32,
    /// Count after the change.
    pub current: u32,
}

impl CountChange {
    /// Returns whether the node is active after the change.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current > 0
    }

    /// Returns whether the change moved the count to or from zero.
    #[inline]
    #[must_use]
    pub const fn crossed_zero(&self) -> bool {
        (self.previous == 0) != (self.current == 0)
    }
}

/// Struct-of-arrays storage for every node of the hierarchy.
///
/// The tree is the sole owner of its nodes. Parent and child relations are
/// slot indices into the parallel arrays, so no node owns another. Slot 0 is
/// the root, whose path is `""`.
#[derive(Debug)]
pub struct HierarchyTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<BTreeMap<String, u32>>,

    // -- Naming --
    pub(crate) key: Vec<String>,
    pub(crate) full_path: Vec<String>,
    pub(crate) description: Vec<String>,

    // -- State --
    pub(crate) count: Vec<u32>,
}

impl Default for HierarchyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyTree {
    /// Creates a tree containing only the root.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self {
            parent: Vec::new(),
            children: Vec::new(),
            key: Vec::new(),
            full_path: Vec::new(),
            description: Vec::new(),
            count: Vec::new(),
        };
        tree.alloc(INVALID, String::new(), String::new());
        tree
    }

    /// Returns the root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the number of nodes, including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    // -- Construction --

    /// Returns the node at `path`, creating any missing segment on the way.
    ///
    /// Idempotent: calling it twice with the same path yields the same node.
    pub fn ensure_path(&mut self, path: &str) -> NodeId {
        let mut idx = NodeId::ROOT.0;
        for key in path::segments(path) {
            let existing = self.children[idx as usize].get(key).copied();
            idx = match existing {
                Some(child) => child,
                None => {
                    let full = path::join(&self.full_path[idx as usize], key);
                    let child = self.alloc(idx, String::from(key), full);
                    self.children[idx as usize].insert(String::from(key), child);
                    child
                }
            };
        }
        NodeId(idx)
    }

    /// Sets the documentation text of a node. It has no behavioral effect.
    pub fn set_description(&mut self, id: NodeId, description: impl Into<String>) {
        self.validate(id);
        self.description[id.slot()] = description.into();
    }

    // -- Lookup --

    /// Returns the node at `path` without creating anything.
    ///
    /// The empty path resolves to the root.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut idx = NodeId::ROOT.0;
        for key in path::segments(path) {
            idx = *self.children[idx as usize].get(key)?;
        }
        Some(NodeId(idx))
    }

    /// Returns the direct child of `id` named `key`.
    #[must_use]
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.validate(id);
        self.children[id.slot()].get(key).copied().map(NodeId)
    }

    /// Returns the parent of a node, or `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.slot()];
        (p != INVALID).then_some(NodeId(p))
    }

    /// Returns an iterator over the direct children of a node, ordered by key.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self.children[id.slot()].values())
    }

    /// Returns whether a node has any children.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        self.validate(id);
        !self.children[id.slot()].is_empty()
    }

    /// Returns a depth-first iterator over `id` and all of its descendants.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Subtree<'_> {
        self.validate(id);
        Subtree::new(self, id.0)
    }

    /// Returns the childless nodes at or below `id`, depth-first.
    pub fn leaves(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.subtree(id)
            .filter(|n| self.children[n.slot()].is_empty())
    }

    // -- Property getters --

    /// Returns the full path of a node (`""` for the root).
    #[must_use]
    pub fn full_path(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.full_path[id.slot()]
    }

    /// Returns the last path segment of a node.
    #[must_use]
    pub fn key(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.key[id.slot()]
    }

    /// Returns the documentation text of a node.
    #[must_use]
    pub fn description(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.description[id.slot()]
    }

    /// Returns the number of segments in the node's path.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        path::depth(self.full_path(id))
    }

    /// Returns the current count of a node.
    #[must_use]
    pub fn count(&self, id: NodeId) -> u32 {
        self.validate(id);
        self.count[id.slot()]
    }

    /// Returns the count at `path`, or 0 if no node exists there.
    #[must_use]
    pub fn count_at(&self, path: &str) -> u32 {
        self.lookup(path).map_or(0, |id| self.count[id.slot()])
    }

    // -- Mutation --

    /// Applies `delta` to a node's count and propagates zero-crossings upward.
    ///
    /// For each node visited, starting at `id`:
    ///
    /// 1. The count becomes `max(0, count + delta)`.
    /// 2. If that leaves the count unchanged, propagation stops.
    /// 3. Otherwise the change is recorded.
    /// 4. The parent receives `+1` if the count left zero, `-1` if it reached
    ///    zero, and nothing otherwise.
    ///
    /// A parent's count therefore tracks how many of its children are active,
    /// not how many active leaves lie below it.
    ///
    /// Returns the recorded changes from `id` toward the root. The caller is
    /// responsible for notifying subscribers of each one.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn change_count(&mut self, id: NodeId, delta: i32) -> Vec<CountChange> {
        self.propagate(id, |previous| {
            if delta >= 0 {
                previous.saturating_add(delta.unsigned_abs())
            } else {
                previous.saturating_sub(delta.unsigned_abs())
            }
        })
    }

    /// Drops a node's count straight to zero in a single change.
    ///
    /// Ancestors are adjusted exactly as for [`change_count`](Self::change_count).
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn reset_count(&mut self, id: NodeId) -> Vec<CountChange> {
        self.propagate(id, |_| 0)
    }

    // -- Internal helpers --

    fn propagate(&mut self, id: NodeId, first: impl FnOnce(u32) -> u32) -> Vec<CountChange> {
        self.validate(id);
        let mut changes = Vec::new();
        let mut idx = id.0;
        let mut previous = self.count[idx as usize];
        let mut current = first(previous);

        // A decrement of an inactive node is absorbed here.
        while current != previous {
            self.count[idx as usize] = current;
            changes.push(CountChange {
                node: NodeId(idx),
                previous,
                current,
            });

            let parent = self.parent[idx as usize];
            if parent == INVALID {
                break;
            }
            let activated = match (previous == 0, current == 0) {
                (true, false) => true,
                (false, true) => false,
                _ => break,
            };
            idx = parent;
            previous = self.count[idx as usize];
            current = if activated {
                previous.saturating_add(1)
            } else {
                previous.saturating_sub(1)
            };
        }

        changes
    }

    fn alloc(&mut self, parent: u32, key: String, full_path: String) -> u32 {
        let idx = u32::try_from(self.parent.len()).unwrap_or(INVALID);
        assert!(idx != INVALID, "node capacity exceeded");
        self.parent.push(parent);
        self.children.push(BTreeMap::new());
        self.key.push(key);
        self.full_path.push(full_path);
        self.description.push(String::new());
        self.count.push(0);
        idx
    }

    /// Panics if the handle does not belong to this tree.
    fn validate(&self, id: NodeId) {
        assert!(
            id.slot() < self.parent.len(),
            "unknown NodeId: {id:?} (tree has {} nodes)",
            self.parent.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn mail_tree() -> (HierarchyTree, NodeId, NodeId, NodeId) {
        let mut tree = HierarchyTree::new();
        let mail = tree.ensure_path("Mail");
        let system = tree.ensure_path("Mail/System");
        let friend = tree.ensure_path("Mail/Friend");
        (tree, mail, system, friend)
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = HierarchyTree::new();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.lookup(""), Some(tree.root()));
        assert_eq!(tree.parent(tree.root()), None);
        assert_eq!(tree.full_path(tree.root()), "");
    }

    #[test]
    fn ensure_path_creates_intermediate_segments() {
        let mut tree = HierarchyTree::new();
        let sword = tree.ensure_path("Shop/Weapon/Sword");
        assert_eq!(tree.node_count(), 4);
        let weapon = tree.lookup("Shop/Weapon").unwrap();
        assert_eq!(tree.parent(sword), Some(weapon));
        assert_eq!(tree.full_path(sword), "Shop/Weapon/Sword");
        assert_eq!(tree.key(sword), "Sword");
        assert_eq!(tree.depth(sword), 3);
    }

    #[test]
    fn ensure_path_is_idempotent() {
        let mut tree = HierarchyTree::new();
        let a = tree.ensure_path("Mail/System");
        let b = tree.ensure_path("Mail/System");
        assert_eq!(a, b);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn lookup_does_not_create() {
        let (tree, ..) = mail_tree();
        assert_eq!(tree.lookup("Mail/Guild"), None);
        assert_eq!(tree.lookup("Shop"), None);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.count_at("Mail/Guild"), 0);
    }

    #[test]
    fn children_are_ordered_by_key() {
        let (tree, mail, system, friend) = mail_tree();
        let kids: Vec<_> = tree.children(mail).collect();
        assert_eq!(kids, vec![friend, system]);
        assert!(tree.has_children(mail));
        assert!(!tree.has_children(system));
        assert_eq!(tree.child(mail, "System"), Some(system));
    }

    #[test]
    fn subtree_and_leaves_are_depth_first() {
        let mut tree = HierarchyTree::new();
        let mail = tree.ensure_path("Mail");
        let friend = tree.ensure_path("Mail/Friend");
        let system = tree.ensure_path("Mail/System");
        let shop = tree.ensure_path("Shop");
        let all: Vec<_> = tree.subtree(tree.root()).collect();
        assert_eq!(all, vec![tree.root(), mail, friend, system, shop]);
        let leaves: Vec<_> = tree.leaves(tree.root()).collect();
        assert_eq!(leaves, vec![friend, system, shop]);
        let single: Vec<_> = tree.leaves(system).collect();
        assert_eq!(single, vec![system]);
    }

    #[test]
    fn activation_propagates_to_every_ancestor() {
        let mut tree = HierarchyTree::new();
        let sword = tree.ensure_path("Shop/Weapon/Sword");
        let changes = tree.change_count(sword, 1);
        assert_eq!(changes.len(), 4, "leaf, two ancestors, and the root");
        assert!(changes.iter().all(|c| c.previous == 0 && c.current == 1));
        assert_eq!(tree.count_at("Shop/Weapon"), 1);
        assert_eq!(tree.count_at("Shop"), 1);
        assert_eq!(tree.count(tree.root()), 1);
    }

    #[test]
    fn second_increment_stays_local() {
        let (mut tree, mail, system, _) = mail_tree();
        tree.change_count(system, 1);
        let changes = tree.change_count(system, 1);
        assert_eq!(
            changes,
            vec![CountChange {
                node: system,
                previous: 1,
                current: 2,
            }]
        );
        assert_eq!(tree.count(system), 2);
        assert_eq!(tree.count(mail), 1);
    }

    #[test]
    fn decrement_at_zero_is_absorbed() {
        let (mut tree, mail, system, _) = mail_tree();
        let changes = tree.change_count(system, -1);
        assert!(changes.is_empty());
        assert_eq!(tree.count(system), 0);
        assert_eq!(tree.count(mail), 0);
    }

    #[test]
    fn sibling_activity_is_counted_once_per_child() {
        let (mut tree, mail, system, friend) = mail_tree();
        tree.change_count(system, 1);
        tree.change_count(friend, 1);
        assert_eq!(tree.count(mail), 2);
        // The root only sees that Mail is active.
        assert_eq!(tree.count(tree.root()), 1);

        tree.change_count(system, -1);
        assert_eq!(tree.count(mail), 1);
        assert_eq!(tree.count(tree.root()), 1);

        let changes = tree.change_count(friend, -1);
        assert_eq!(changes.len(), 3);
        assert!(changes.iter().all(CountChange::crossed_zero));
        assert_eq!(tree.count(mail), 0);
        assert_eq!(tree.count(tree.root()), 0);
    }

    #[test]
    fn large_decrement_clamps_and_propagates_once() {
        let (mut tree, mail, system, _) = mail_tree();
        tree.change_count(system, 1);
        tree.change_count(system, 1);
        tree.change_count(system, 1);
        let changes = tree.change_count(system, -10);
        assert_eq!(changes[0].previous, 3);
        assert_eq!(changes[0].current, 0);
        assert_eq!(changes[1].node, mail);
        assert_eq!(tree.count(mail), 0);
    }

    #[test]
    fn reset_count_is_one_change_per_node() {
        let (mut tree, mail, system, friend) = mail_tree();
        tree.change_count(system, 1);
        tree.change_count(system, 1);
        tree.change_count(friend, 1);

        let changes = tree.reset_count(system);
        assert_eq!(changes.len(), 2);
        assert_eq!((changes[0].previous, changes[0].current), (2, 0));
        assert_eq!((changes[1].node, changes[1].current), (mail, 1));
        assert!(tree.reset_count(system).is_empty());
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let (mut tree, _, system, _) = mail_tree();
        assert!(tree.change_count(system, 0).is_empty());
    }

    #[test]
    fn description_is_stored() {
        let (mut tree, mail, ..) = mail_tree();
        tree.set_description(mail, "Mailbox");
        assert_eq!(tree.description(mail), "Mailbox");
    }

    #[test]
    #[should_panic(expected = "unknown NodeId")]
    fn foreign_handle_panics() {
        let (tree, ..) = mail_tree();
        let _ = tree.count(NodeId(99));
    }
}
