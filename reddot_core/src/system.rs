// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The red dot context: tree, registry, and configuration under one owner.
//!
//! [`RedDotSystem`] is the handle callers hold (or reach through
//! [`shared`](crate::shared)). It validates a [`Configuration`], builds the
//! [`HierarchyTree`] from it, accepts leaf mutations, and forwards every
//! resulting count change to the [`NotificationRegistry`].
//!
//! # Lifecycle
//!
//! - [`initialize`](RedDotSystem::initialize) validates and builds a new tree.
//!   On failure the current tree and configuration are kept.
//! - [`reload`](RedDotSystem::reload) rebuilds from the stored configuration.
//! - [`reset`](RedDotSystem::reset) drops everything, subscribers included.
//!
//! Subscriptions are keyed by path, so they carry over to the new tree
//! unchanged. Rebuilding zeroes every count; subscribers whose path was
//! active before the rebuild receive `false` once, deepest paths first.
//!
//! # Reentrancy
//!
//! Subscribers run inside the mutating call and cannot reach the system that
//! is notifying them. Code that must react to a notification with another
//! mutation should queue it and apply it after the call returns.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Reverse;
use core::fmt;

use crate::config::Configuration;
use crate::error::{DispatchFailure, StateError, SubscriberError, ValidationErrors};
use crate::path;
use crate::registry::{NotificationRegistry, Subscriber, SubscriberId};
use crate::trace::{
    ConfigRejectedEvent, CountChangedEvent, InitializedEvent, RejectedMutationEvent,
    SubscriberFailedEvent, SubscriptionEvent, SubscriptionKind, TraceSink, Tracer,
};
use crate::tree::{CountChange, HierarchyTree, NodeId};

/// Everything a single mutation call did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Count changes in the order they were applied, each leaf followed by
    /// the ancestors it reached.
    pub changes: Vec<CountChange>,
    /// Subscriber failures captured while notifying.
    pub failures: Vec<DispatchFailure>,
}

impl Propagation {
    /// Returns whether no count changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns whether every subscriber accepted its notification.
    #[must_use]
    pub fn delivered_cleanly(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Hierarchical red dot state with change notification.
pub struct RedDotSystem {
    tree: HierarchyTree,
    registry: NotificationRegistry,
    config: Option<Configuration>,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for RedDotSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedDotSystem")
            .field("tree", &self.tree)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Default for RedDotSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl RedDotSystem {
    /// Creates an uninitialized system: a bare root and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: HierarchyTree::new(),
            registry: NotificationRegistry::new(),
            config: None,
            sink: None,
        }
    }

    /// Installs a trace sink.
    ///
    /// Events only reach it when the `trace` feature is enabled.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replaces the trace sink and returns the previous one.
    pub fn set_trace_sink(
        &mut self,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Option<Box<dyn TraceSink>> {
        core::mem::replace(&mut self.sink, sink)
    }

    // -- Lifecycle --

    /// Validates `config` and rebuilds the tree from it.
    ///
    /// Definitions are applied in non-decreasing depth order. On error
    /// nothing changes and every validation problem is returned.
    ///
    /// Existing subscriptions are kept. Every subscribed path that was active
    /// before the rebuild is notified with `false`, since all counts restart
    /// at zero.
    pub fn initialize(&mut self, config: Configuration) -> Result<(), ValidationErrors> {
        self.build(config, false)
    }

    /// Rebuilds the tree from the stored configuration.
    ///
    /// Does nothing if no configuration has been loaded. Otherwise every
    /// count returns to zero and subscribers of previously active paths
    /// receive `false`, as with [`initialize`](Self::initialize).
    pub fn reload(&mut self) -> Result<(), ValidationErrors> {
        match self.config.clone() {
            Some(config) => self.build(config, true),
            None => Ok(()),
        }
    }

    /// Discards the tree, the configuration, and every subscriber.
    ///
    /// The trace sink is kept.
    pub fn reset(&mut self) {
        self.tree = HierarchyTree::new();
        self.registry.clear();
        self.config = None;
    }

    /// Returns the loaded configuration, if any.
    #[must_use]
    pub fn configuration(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    /// Returns the node tree.
    #[must_use]
    pub fn tree(&self) -> &HierarchyTree {
        &self.tree
    }

    /// Returns the subscriber registry.
    #[must_use]
    pub fn registry(&self) -> &NotificationRegistry {
        &self.registry
    }

    // -- Queries --

    /// Returns the count at `path`, or 0 if the path is unknown.
    #[must_use]
    pub fn count(&self, path: &str) -> u32 {
        self.tree.count_at(path)
    }

    /// Returns whether `path` currently shows a red dot.
    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.count(path) > 0
    }

    /// Returns the configured leaf paths that are active, in configuration
    /// order.
    #[must_use]
    pub fn active_leaf_paths(&self) -> Vec<&str> {
        let Some(config) = &self.config else {
            return Vec::new();
        };
        config
            .leaf_paths()
            .filter(|p| self.tree.count_at(p) > 0)
            .collect()
    }

    // -- Mutation --

    /// Reports the raw activity of a leaf.
    ///
    /// `true` increments the leaf's count and `false` decrements it (never
    /// below zero). Ancestors are adjusted on zero-crossings only; see
    /// [`HierarchyTree::change_count`]. Every count change is delivered to the
    /// subscribers of the changed path, even when its active state did not
    /// flip.
    ///
    /// Unknown paths, the root, and nodes with children are rejected without
    /// changing anything.
    pub fn set_state(&mut self, path: &str, active: bool) -> Result<Propagation, StateError> {
        let id = self.mutation_target(path)?;
        let mut out = Propagation::default();
        let changes = self.tree.change_count(id, if active { 1 } else { -1 });
        self.dispatch(changes, &mut out);
        Ok(out)
    }

    /// Clears the red dots at or below `path`.
    ///
    /// A childless node drops straight to zero in one change. For an interior
    /// node, every configured leaf equal to or beneath `path` is cleared the
    /// same way; the empty path clears every configured leaf. Definitions
    /// marked as leaves that nevertheless have children are skipped, so
    /// interior counts only ever move through propagation.
    pub fn clear(&mut self, path: &str) -> Result<Propagation, StateError> {
        let Some(id) = self.tree.lookup(path) else {
            return Err(self.reject(StateError::PathNotFound { path: path.into() }));
        };

        let targets: Vec<NodeId> = if !self.tree.has_children(id) {
            if id == self.tree.root() {
                Vec::new()
            } else {
                Vec::from([id])
            }
        } else {
            self.config
                .iter()
                .flat_map(Configuration::leaf_paths)
                .filter(|leaf| path::is_within(leaf, path))
                .filter_map(|leaf| self.tree.lookup(leaf))
                .filter(|&leaf| !self.tree.has_children(leaf))
                .collect()
        };

        let mut out = Propagation::default();
        for target in targets {
            let changes = self.tree.reset_count(target);
            self.dispatch(changes, &mut out);
        }
        Ok(out)
    }

    // -- Subscription --

    /// Subscribes `callback` to `path` and immediately calls it with the
    /// path's current state (`false` for unknown paths).
    ///
    /// A failure of that first call is reported to the trace sink; the
    /// subscription stays in place either way.
    pub fn register<F>(&mut self, path: &str, callback: F) -> SubscriberId
    where
        F: FnMut(bool) -> Result<(), SubscriberError> + 'static,
    {
        let id = self.registry.register(path, callback);
        self.sync_new_subscriber(path, id);
        id
    }

    /// Like [`register`](Self::register), for a [`Subscriber`] implementation.
    pub fn register_subscriber(
        &mut self,
        path: &str,
        subscriber: impl Subscriber + 'static,
    ) -> SubscriberId {
        let id = self.registry.register_subscriber(path, subscriber);
        self.sync_new_subscriber(path, id);
        id
    }

    /// Removes the subscriber `id` from `path`.
    ///
    /// Returns whether it was registered there. Unknown subscribers are
    /// ignored.
    pub fn unregister(&mut self, path: &str, id: SubscriberId) -> bool {
        let removed = self.registry.unregister(path, id);
        if removed {
            tracer(&mut self.sink).subscription(&SubscriptionEvent {
                path,
                subscriber: id,
                kind: SubscriptionKind::Unregistered,
            });
        }
        removed
    }

    // -- Internal helpers --

    fn build(&mut self, config: Configuration, reload: bool) -> Result<(), ValidationErrors> {
        let mut tracer = tracer(&mut self.sink);
        if let Err(errors) = config.validate() {
            tracer.config_rejected(&ConfigRejectedEvent { errors: &errors });
            return Err(errors);
        }

        let mut tree = HierarchyTree::new();
        for definition in config.sorted_by_depth() {
            let id = tree.ensure_path(&definition.full_path);
            tree.set_description(id, definition.description.as_str());
        }

        let mut stale: Vec<String> = self
            .registry
            .paths()
            .filter(|p| self.tree.count_at(p) > 0 && tree.count_at(p) == 0)
            .map(String::from)
            .collect();
        stale.sort_by_key(|p| Reverse(path::depth(p)));

        tracer.initialized(&InitializedEvent {
            definitions: config.len(),
            leaves: config.leaf_paths().count(),
            nodes: tree.node_count(),
            reload,
        });
        self.tree = tree;
        self.config = Some(config);

        for path in &stale {
            for failure in self.registry.notify(path, false) {
                tracer.subscriber_failed(&SubscriberFailedEvent { failure: &failure });
            }
        }
        Ok(())
    }

    fn mutation_target(&mut self, path: &str) -> Result<NodeId, StateError> {
        match self.tree.lookup(path) {
            None => Err(self.reject(StateError::PathNotFound { path: path.into() })),
            Some(id) if id == self.tree.root() || self.tree.has_children(id) => {
                Err(self.reject(StateError::InvalidMutationTarget { path: path.into() }))
            }
            Some(id) => Ok(id),
        }
    }

    fn reject(&mut self, error: StateError) -> StateError {
        tracer(&mut self.sink).rejected_mutation(&RejectedMutationEvent { error: &error });
        error
    }

    /// Notifies the subscribers of each changed path, in order.
    fn dispatch(&mut self, changes: Vec<CountChange>, out: &mut Propagation) {
        let mut tracer = tracer(&mut self.sink);
        for change in &changes {
            let path = self.tree.full_path(change.node);
            tracer.count_changed(&CountChangedEvent {
                path,
                previous: change.previous,
                current: change.current,
            });
            for failure in self.registry.notify(path, change.is_active()) {
                tracer.subscriber_failed(&SubscriberFailedEvent { failure: &failure });
                out.failures.push(failure);
            }
        }
        out.changes.extend(changes);
    }

    fn sync_new_subscriber(&mut self, path: &str, id: SubscriberId) {
        let mut tracer = tracer(&mut self.sink);
        tracer.subscription(&SubscriptionEvent {
            path,
            subscriber: id,
            kind: SubscriptionKind::Registered,
        });
        let active = self.tree.count_at(path) > 0;
        if let Err(failure) = self.registry.deliver(path, id, active) {
            tracer.subscriber_failed(&SubscriberFailedEvent { failure: &failure });
        }
    }
}

fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
    match sink {
        Some(sink) => Tracer::new(sink.as_mut()),
        None => Tracer::none(),
    }
}
