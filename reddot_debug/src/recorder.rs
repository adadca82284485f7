// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and keeps an owned copy of every
//! event as a [`RecordedEvent`], in arrival order. Recordings can be inspected
//! directly or exported with [`json::export`](crate::json::export).

use reddot_core::trace::{
    ConfigRejectedEvent, CountChangedEvent, InitializedEvent, RejectedMutationEvent,
    SubscriberFailedEvent, SubscriptionEvent, SubscriptionKind, TraceSink,
};
use reddot_core::{ConfigError, StateError, SubscriberId};

/// An owned trace event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// See [`CountChangedEvent`].
    CountChanged {
        /// Node path.
        path: String,
        /// Count before the change.
        previous: u32,
        /// Count after the change.
        current: u32,
    },
    /// See [`RejectedMutationEvent`].
    RejectedMutation(StateError),
    /// See [`InitializedEvent`].
    Initialized(InitializedEvent),
    /// See [`ConfigRejectedEvent`].
    ConfigRejected(Vec<ConfigError>),
    /// See [`SubscriberFailedEvent`].
    SubscriberFailed {
        /// Path being notified.
        path: String,
        /// The failing subscriber.
        subscriber: SubscriberId,
        /// The reported message.
        message: String,
    },
    /// See [`SubscriptionEvent`].
    Subscription {
        /// Subscribed path.
        path: String,
        /// The subscriber.
        subscriber: SubscriberId,
        /// Added or removed.
        kind: SubscriptionKind,
    },
}

impl RecordedEvent {
    /// Short stable name of the event kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CountChanged { .. } => "CountChanged",
            Self::RejectedMutation(_) => "RejectedMutation",
            Self::Initialized(_) => "Initialized",
            Self::ConfigRejected(_) => "ConfigRejected",
            Self::SubscriberFailed { .. } => "SubscriberFailed",
            Self::Subscription { .. } => "Subscription",
        }
    }
}

/// A [`TraceSink`] that records every event it receives.
#[derive(Clone, Debug, Default)]
pub struct RecorderSink {
    events: Vec<RecordedEvent>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Consumes the recorder and returns the recorded events.
    #[must_use]
    pub fn into_events(self) -> Vec<RecordedEvent> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns the `(path, previous, current)` of every count change.
    pub fn count_changes(&self) -> impl Iterator<Item = (&str, u32, u32)> {
        self.events.iter().filter_map(|e| match e {
            RecordedEvent::CountChanged {
                path,
                previous,
                current,
            } => Some((path.as_str(), *previous, *current)),
            _ => None,
        })
    }
}

impl TraceSink for RecorderSink {
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        self.events.push(RecordedEvent::CountChanged {
            path: e.path.into(),
            previous: e.previous,
            current: e.current,
        });
    }

    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        self.events
            .push(RecordedEvent::RejectedMutation(e.error.clone()));
    }

    fn on_initialized(&mut self, e: &InitializedEvent) {
        self.events.push(RecordedEvent::Initialized(*e));
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        self.events
            .push(RecordedEvent::ConfigRejected(e.errors.errors().to_vec()));
    }

    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        self.events.push(RecordedEvent::SubscriberFailed {
            path: e.failure.path.clone(),
            subscriber: e.failure.subscriber,
            message: e.failure.error.message().into(),
        });
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        self.events.push(RecordedEvent::Subscription {
            path: e.path.into(),
            subscriber: e.subscriber,
            kind: e.kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use reddot_core::{Configuration, PathDefinition, RedDotSystem, SubscriberError};

    use super::*;

    fn shop() -> Configuration {
        Configuration::new()
            .with_path(PathDefinition::category("Shop"))
            .with_path(PathDefinition::category("Shop/Weapon"))
            .with_path(PathDefinition::leaf("Shop/Weapon/Sword"))
    }

    #[test]
    fn records_propagation_in_order() {
        let shared = Rc::new(RefCell::new(RecorderSink::new()));
        let mut system = RedDotSystem::new().with_trace_sink(Rc::clone(&shared));
        system.initialize(shop()).unwrap();
        system.set_state("Shop/Weapon/Sword", true).unwrap();

        let rec = shared.borrow();
        assert_eq!(
            rec.events()[0],
            RecordedEvent::Initialized(InitializedEvent {
                definitions: 3,
                leaves: 1,
                nodes: 4,
                reload: false,
            })
        );
        let changes: Vec<_> = rec.count_changes().collect();
        assert_eq!(
            changes,
            [
                ("Shop/Weapon/Sword", 0, 1),
                ("Shop/Weapon", 0, 1),
                ("Shop", 0, 1),
                ("", 0, 1),
            ]
        );
    }

    #[test]
    fn records_rejections_and_failures() {
        let shared = Rc::new(RefCell::new(RecorderSink::new()));
        let mut system = RedDotSystem::new().with_trace_sink(Rc::clone(&shared));
        system.initialize(shop()).unwrap();

        let _ = system.set_state("Shop", true);
        let id = system.register("Shop", |active| {
            if active {
                Err(SubscriberError::new("badge gone"))
            } else {
                Ok(())
            }
        });
        system.set_state("Shop/Weapon/Sword", true).unwrap();

        let rec = shared.borrow();
        let names: Vec<_> = rec.events().iter().map(RecordedEvent::name).collect();
        assert_eq!(
            names,
            [
                "Initialized",
                "RejectedMutation",
                "Subscription",
                "CountChanged",
                "CountChanged",
                "CountChanged",
                "SubscriberFailed",
                "CountChanged",
            ]
        );
        assert!(rec.events().contains(&RecordedEvent::SubscriberFailed {
            path: "Shop".into(),
            subscriber: id,
            message: "badge gone".into(),
        }));
    }

    #[test]
    fn records_config_rejection() {
        let mut rec = RecorderSink::new();
        let mut system = RedDotSystem::new();
        let bad = Configuration::new().with_path(PathDefinition::leaf("Shop/Weapon"));
        let errors = system.initialize(bad).unwrap_err();
        rec.on_config_rejected(&ConfigRejectedEvent { errors: &errors });

        assert_eq!(
            rec.into_events(),
            [RecordedEvent::ConfigRejected(errors.into_errors())]
        );
    }

    #[test]
    fn clear_discards_events() {
        let mut rec = RecorderSink::new();
        rec.on_count_changed(&CountChangedEvent {
            path: "Shop",
            previous: 0,
            current: 1,
        });
        assert_eq!(rec.events().len(), 1);
        rec.clear();
        assert!(rec.events().is_empty());
    }
}
