// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical "red dot" attention indicators with change notification.
//!
//! `reddot_core` tracks which UI features need the user's attention and rolls
//! that state up a slash-delimited namespace: if `Mail/System` has something
//! new, `Mail` and the root light up too. It is `no_std` compatible (with
//! `alloc`) and stores the hierarchy as a struct-of-arrays tree addressed by
//! index handles.
//!
//! # Architecture
//!
//! ```text
//!   Configuration ──► validate() ──► HierarchyTree (built in depth order)
//!                                           │
//!   set_state(leaf) / clear(path)           │
//!       │                                   ▼
//!       └──────────► change_count() ──► Vec<CountChange>
//!                                           │
//!                 ┌─────────────────────────┘
//!                 ▼
//!   NotificationRegistry::notify(path, active) ──► Subscriber::on_state()
//! ```
//!
//! **[`path`]**: Helpers for slash-delimited paths. The root is `""`.
//!
//! **[`tree`]**: Struct-of-arrays node tree. Each node holds a non-negative
//! count; a parent's count is the number of its children that are active.
//! Counts only move through [`HierarchyTree::change_count`] and
//! [`HierarchyTree::reset_count`], which report every change they make.
//!
//! **[`registry`]**: Path-keyed subscribers with independent delivery.
//!
//! **[`config`]**: Static path definitions and their validation.
//!
//! **[`system`]**: [`RedDotSystem`], the context object tying the pieces
//! together.
//!
//! **[`shared`]**: One [`RedDotSystem`] per thread behind free functions
//! (requires `std`).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types with
//! the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use reddot_core::{Configuration, PathDefinition, RedDotSystem};
//!
//! let mut system = RedDotSystem::new();
//! system
//!     .initialize(
//!         Configuration::new()
//!             .with_path(PathDefinition::category("Mail"))
//!             .with_path(PathDefinition::leaf("Mail/System")),
//!     )
//!     .unwrap();
//!
//! system.set_state("Mail/System", true).unwrap();
//! assert!(system.is_active("Mail"));
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables the [`shared`] module and `std`
//!   support in dependencies.
//! - `serde` (disabled by default): `Serialize`/`Deserialize` for the
//!   configuration types.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod error;
pub mod path;
pub mod registry;
#[cfg(feature = "std")]
pub mod shared;
pub mod system;
pub mod trace;
pub mod tree;

pub use config::{Configuration, DefinitionNode, PathDefinition};
pub use error::{ConfigError, DispatchFailure, StateError, SubscriberError, ValidationErrors};
pub use registry::{NotificationRegistry, Subscriber, SubscriberId};
pub use system::{Propagation, RedDotSystem};
pub use tree::{CountChange, HierarchyTree, NodeId};
