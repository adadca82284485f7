// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the red dot system.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`RedDotSystem`](crate::system::RedDotSystem) calls as it initializes,
//! mutates counts, and dispatches to subscribers. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Ready-made sinks (pretty printing, recording, forwarding to `log`) live in
//! the `reddot_debug` crate.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::error::{DispatchFailure, StateError, ValidationErrors};
use crate::registry::SubscriberId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every count mutation, in propagation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountChangedEvent<'a> {
    /// Path of the node (`""` for the root).
    pub path: &'a str,
    /// Count before the change.
    pub previous: u32,
    /// Count after the change.
    pub current: u32,
}

impl CountChangedEvent<'_> {
    /// Returns whether the node is active after the change.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current > 0
    }
}

/// Emitted when a mutation is ignored.
#[derive(Clone, Copy, Debug)]
pub struct RejectedMutationEvent<'a> {
    /// Why it was ignored.
    pub error: &'a StateError,
}

/// Emitted after a tree has been built from a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializedEvent {
    /// Number of path definitions.
    pub definitions: usize,
    /// Number of leaf definitions.
    pub leaves: usize,
    /// Number of nodes in the new tree, including the root.
    pub nodes: usize,
    /// Whether this was a reload of the stored configuration.
    pub reload: bool,
}

/// Emitted when a configuration fails validation.
#[derive(Clone, Copy, Debug)]
pub struct ConfigRejectedEvent<'a> {
    /// Every problem found.
    pub errors: &'a ValidationErrors,
}

/// Emitted when a subscriber reports a failure.
#[derive(Clone, Copy, Debug)]
pub struct SubscriberFailedEvent<'a> {
    /// The captured failure.
    pub failure: &'a DispatchFailure,
}

/// What happened to a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionKind {
    /// A subscriber was added.
    Registered,
    /// A subscriber was removed.
    Unregistered,
}

/// Emitted when a subscriber is added or removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionEvent<'a> {
    /// Subscribed path.
    pub path: &'a str,
    /// The subscriber.
    pub subscriber: SubscriberId,
    /// Added or removed.
    pub kind: SubscriptionKind,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the red dot system.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for each count mutation.
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        _ = e;
    }

    /// Called when a mutation is ignored.
    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        _ = e;
    }

    /// Called after a successful (re)initialization.
    fn on_initialized(&mut self, e: &InitializedEvent) {
        _ = e;
    }

    /// Called when a configuration fails validation.
    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        _ = e;
    }

    /// Called when a subscriber reports a failure.
    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        _ = e;
    }

    /// Called when a subscriber is added or removed.
    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        _ = e;
    }
}

/// Forwards through a shared handle, so the caller can keep reading a sink
/// that a [`RedDotSystem`](crate::system::RedDotSystem) owns.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        self.borrow_mut().on_count_changed(e);
    }

    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        self.borrow_mut().on_rejected_mutation(e);
    }

    fn on_initialized(&mut self, e: &InitializedEvent) {
        self.borrow_mut().on_initialized(e);
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        self.borrow_mut().on_config_rejected(e);
    }

    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        self.borrow_mut().on_subscriber_failed(e);
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        self.borrow_mut().on_subscription(e);
    }
}

/// Fans every event out to both sinks, first `A` then `B`.
impl<A: TraceSink, B: TraceSink> TraceSink for (A, B) {
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        self.0.on_count_changed(e);
        self.1.on_count_changed(e);
    }

    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        self.0.on_rejected_mutation(e);
        self.1.on_rejected_mutation(e);
    }

    fn on_initialized(&mut self, e: &InitializedEvent) {
        self.0.on_initialized(e);
        self.1.on_initialized(e);
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        self.0.on_config_rejected(e);
        self.1.on_config_rejected(e);
    }

    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        self.0.on_subscriber_failed(e);
        self.1.on_subscriber_failed(e);
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        self.0.on_subscription(e);
        self.1.on_subscription(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`CountChangedEvent`].
    #[inline]
    pub fn count_changed(&mut self, e: &CountChangedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_count_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RejectedMutationEvent`].
    #[inline]
    pub fn rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rejected_mutation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`InitializedEvent`].
    #[inline]
    pub fn initialized(&mut self, e: &InitializedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_initialized(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ConfigRejectedEvent`].
    #[inline]
    pub fn config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_config_rejected(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SubscriberFailedEvent`].
    #[inline]
    pub fn subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_subscriber_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SubscriptionEvent`].
    #[inline]
    pub fn subscription(&mut self, e: &SubscriptionEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_subscription(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_change() -> CountChangedEvent<'static> {
        CountChangedEvent {
            path: "Mail/System",
            previous: 0,
            current: 1,
        }
    }

    #[test]
    fn count_changed_reports_activity() {
        assert!(sample_change().is_active());
        let cleared = CountChangedEvent {
            current: 0,
            ..sample_change()
        };
        assert!(!cleared.is_active());
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_count_changed(&sample_change());
        sink.on_initialized(&InitializedEvent {
            definitions: 3,
            leaves: 2,
            nodes: 4,
            reload: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.count_changed(&sample_change());
        tracer.rejected_mutation(&RejectedMutationEvent {
            error: &StateError::PathNotFound {
                path: "Nowhere".into(),
            },
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::String;
        use alloc::vec::Vec;

        struct RecordingSink {
            paths: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
                self.paths.push(e.path.into());
            }
        }

        let mut sink = RecordingSink { paths: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.count_changed(&sample_change());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.paths, ["Mail/System"]);
    }

    #[derive(Default)]
    struct Counter(usize);

    impl TraceSink for Counter {
        fn on_count_changed(&mut self, _: &CountChangedEvent<'_>) {
            self.0 += 1;
        }
    }

    #[test]
    fn shared_handle_forwards() {
        let shared = Rc::new(RefCell::new(Counter::default()));
        let mut handle = Rc::clone(&shared);
        handle.on_count_changed(&sample_change());
        handle.on_initialized(&InitializedEvent {
            definitions: 0,
            leaves: 0,
            nodes: 1,
            reload: true,
        });
        assert_eq!(shared.borrow().0, 1);
    }

    #[test]
    fn pair_fans_out() {
        let mut pair = (Counter::default(), (NoopSink, Counter::default()));
        pair.on_count_changed(&sample_change());
        pair.on_count_changed(&sample_change());
        assert_eq!(pair.0.0, 2);
        assert_eq!((pair.1).1.0, 2);
    }
}
