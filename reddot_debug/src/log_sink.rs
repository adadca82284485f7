// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding trace events to the [`log`] facade.
//!
//! | Event              | Level   |
//! |--------------------|---------|
//! | initialized        | `info`  |
//! | rejected mutation  | `warn`  |
//! | rejected config    | `warn`  |
//! | subscriber failure | `error` |
//! | count change       | `debug` |
//! | subscription       | `trace` |

use log::{debug, error, info, trace, warn};

use reddot_core::trace::{
    ConfigRejectedEvent, CountChangedEvent, InitializedEvent, RejectedMutationEvent,
    SubscriberFailedEvent, SubscriptionEvent, SubscriptionKind, TraceSink,
};

use crate::pretty::display_path;

/// Default log target.
pub const TARGET: &str = "reddot";

/// A [`TraceSink`] that emits `log` records.
#[derive(Clone, Debug)]
pub struct LogSink {
    target: &'static str,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    /// Creates a sink logging under [`TARGET`].
    #[must_use]
    pub const fn new() -> Self {
        Self { target: TARGET }
    }

    /// Creates a sink logging under a custom target.
    #[must_use]
    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl TraceSink for LogSink {
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        debug!(
            target: self.target,
            "{}: {} -> {}",
            display_path(e.path),
            e.previous,
            e.current
        );
    }

    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        warn!(target: self.target, "ignored mutation: {}", e.error);
    }

    fn on_initialized(&mut self, e: &InitializedEvent) {
        info!(
            target: self.target,
            "{} {} definitions ({} leaves, {} nodes)",
            if e.reload { "reloaded" } else { "initialized" },
            e.definitions,
            e.leaves,
            e.nodes
        );
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        warn!(target: self.target, "{}", e.errors);
    }

    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        error!(target: self.target, "{}", e.failure);
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        let action = match e.kind {
            SubscriptionKind::Registered => "registered",
            SubscriptionKind::Unregistered => "unregistered",
        };
        trace!(
            target: self.target,
            "{action} subscriber {} on {}",
            e.subscriber.get(),
            display_path(e.path)
        );
    }
}
