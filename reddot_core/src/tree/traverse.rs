// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::collections::btree_map;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::id::NodeId;
use super::store::HierarchyTree;

/// An iterator over the direct children of a node, ordered by key.
///
/// Created by [`HierarchyTree::children`].
#[derive(Debug)]
pub struct Children<'a> {
    inner: btree_map::Values<'a, String, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(inner: btree_map::Values<'a, String, u32>) -> Self {
        Self { inner }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().copied().map(NodeId)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

/// A pre-order iterator over a node and all of its descendants.
///
/// Siblings are visited in key order. Created by [`HierarchyTree::subtree`].
#[derive(Debug)]
pub struct Subtree<'a> {
    tree: &'a HierarchyTree,
    stack: Vec<u32>,
}

impl<'a> Subtree<'a> {
    pub(crate) fn new(tree: &'a HierarchyTree, start: u32) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl Iterator for Subtree<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.stack.pop()?;
        // Reversed so the smallest key is popped first.
        self.stack
            .extend(self.tree.children[idx as usize].values().rev().copied());
        Some(NodeId(idx))
    }
}
