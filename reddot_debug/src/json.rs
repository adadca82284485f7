// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes the events of a [`RecorderSink`](crate::recorder::RecorderSink)
//! as a JSON array, one object per event. Every object has a `"name"` and a
//! `"seq"` (position in the recording); the remaining fields depend on the
//! event.

use std::io::{self, Write};

use serde_json::{Value, json};

use reddot_core::trace::SubscriptionKind;

use crate::recorder::RecordedEvent;

/// Converts one recorded event to a JSON object.
#[must_use]
pub fn to_value(seq: usize, event: &RecordedEvent) -> Value {
    let name = event.name();
    match event {
        RecordedEvent::CountChanged {
            path,
            previous,
            current,
        } => json!({
            "name": name,
            "seq": seq,
            "path": path,
            "previous": previous,
            "current": current,
            "active": *current > 0,
        }),
        RecordedEvent::RejectedMutation(error) => json!({
            "name": name,
            "seq": seq,
            "path": error.path(),
            "reason": error.to_string(),
        }),
        RecordedEvent::Initialized(e) => json!({
            "name": name,
            "seq": seq,
            "definitions": e.definitions,
            "leaves": e.leaves,
            "nodes": e.nodes,
            "reload": e.reload,
        }),
        RecordedEvent::ConfigRejected(errors) => json!({
            "name": name,
            "seq": seq,
            "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }),
        RecordedEvent::SubscriberFailed {
            path,
            subscriber,
            message,
        } => json!({
            "name": name,
            "seq": seq,
            "path": path,
            "subscriber": subscriber.get(),
            "message": message,
        }),
        RecordedEvent::Subscription {
            path,
            subscriber,
            kind,
        } => {
            let kind = match kind {
                SubscriptionKind::Registered => "registered",
                SubscriptionKind::Unregistered => "unregistered",
            };
            json!({
                "name": name,
                "seq": seq,
                "path": path,
                "subscriber": subscriber.get(),
                "kind": kind,
            })
        }
    }
}

/// Exports recorded events as a pretty-printed JSON array.
pub fn export(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events
        .iter()
        .enumerate()
        .map(|(seq, e)| to_value(seq, e))
        .collect();
    serde_json::to_writer_pretty(writer, &values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use reddot_core::StateError;
    use reddot_core::trace::{CountChangedEvent, RejectedMutationEvent, TraceSink};

    use super::*;
    use crate::recorder::RecorderSink;

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_count_changed(&CountChangedEvent {
            path: "Mail/System",
            previous: 0,
            current: 1,
        });
        rec.on_rejected_mutation(&RejectedMutationEvent {
            error: &StateError::InvalidMutationTarget {
                path: "Mail".into(),
            },
        });

        let mut out = Vec::new();
        export(rec.events(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 2);

        assert_eq!(parsed[0]["name"], "CountChanged");
        assert_eq!(parsed[0]["seq"], 0);
        assert_eq!(parsed[0]["path"], "Mail/System");
        assert_eq!(parsed[0]["active"], true);

        assert_eq!(parsed[1]["name"], "RejectedMutation");
        assert_eq!(parsed[1]["path"], "Mail");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
