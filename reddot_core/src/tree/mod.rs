// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchy tree data model.
//!
//! A *node* is a position in the namespace of UI features. Each node has:
//!
//! - An identity ([`NodeId`]) that indexes the tree's parallel arrays.
//! - A key (its last path segment) and a full slash-delimited path.
//! - Topology: one parent (none for the root) and a key-ordered child map.
//! - A non-negative **count**.
//!
//! # Counts
//!
//! Only childless nodes are mutated directly. When a node's count leaves or
//! returns to zero, its parent's count moves by one in the same direction;
//! changes that do not cross zero stay local. A parent's count is therefore
//! the number of its *children* that are active, not the number of active
//! leaves beneath it. See [`HierarchyTree::change_count`].

mod id;
mod store;
mod traverse;

pub use id::NodeId;
pub use store::{CountChange, HierarchyTree};
pub use traverse::{Children, Subtree};
