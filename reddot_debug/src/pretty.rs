// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). The root path
//! is printed as `<root>`.

use std::io::Write;

use reddot_core::trace::{
    ConfigRejectedEvent, CountChangedEvent, InitializedEvent, RejectedMutationEvent,
    SubscriberFailedEvent, SubscriptionEvent, SubscriptionKind, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub(crate) fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_count_changed(&mut self, e: &CountChangedEvent<'_>) {
        let edge = match (e.previous > 0, e.is_active()) {
            (false, true) => " (on)",
            (true, false) => " (off)",
            _ => "",
        };
        let _ = writeln!(
            self.writer,
            "[count] {} {} -> {}{edge}",
            display_path(e.path),
            e.previous,
            e.current,
        );
    }

    fn on_rejected_mutation(&mut self, e: &RejectedMutationEvent<'_>) {
        let _ = writeln!(self.writer, "[rejected] {}", e.error);
    }

    fn on_initialized(&mut self, e: &InitializedEvent) {
        let kind = if e.reload { "reload" } else { "init" };
        let _ = writeln!(
            self.writer,
            "[{kind}] definitions={} leaves={} nodes={}",
            e.definitions, e.leaves, e.nodes,
        );
    }

    fn on_config_rejected(&mut self, e: &ConfigRejectedEvent<'_>) {
        let _ = writeln!(self.writer, "[config] rejected: {}", e.errors.len());
        for error in e.errors.errors() {
            let _ = writeln!(self.writer, "  - {error}");
        }
    }

    fn on_subscriber_failed(&mut self, e: &SubscriberFailedEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[subscriber] {} #{} failed: {}",
            display_path(&e.failure.path),
            e.failure.subscriber.get(),
            e.failure.error,
        );
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent<'_>) {
        let verb = match e.kind {
            SubscriptionKind::Registered => "+",
            SubscriptionKind::Unregistered => "-",
        };
        let _ = writeln!(
            self.writer,
            "[subscription] {verb}{} #{}",
            display_path(e.path),
            e.subscriber.get(),
        );
    }
}

#[cfg(test)]
mod tests {
    use reddot_core::{Configuration, PathDefinition, RedDotSystem, StateError};

    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_count_change() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_count_changed(&CountChangedEvent {
            path: "Mail/System",
            previous: 0,
            current: 1,
        });
        sink.on_count_changed(&CountChangedEvent {
            path: "",
            previous: 1,
            current: 0,
        });
        let output = output(sink);
        assert!(output.contains("[count] Mail/System 0 -> 1 (on)"), "got: {output}");
        assert!(output.contains("[count] <root> 1 -> 0 (off)"), "got: {output}");
    }

    #[test]
    fn pretty_print_rejection() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_rejected_mutation(&RejectedMutationEvent {
            error: &StateError::PathNotFound {
                path: "Guild".into(),
            },
        });
        let output = output(sink);
        assert!(output.starts_with("[rejected]"), "got: {output}");
        assert!(output.contains("Guild"), "got: {output}");
    }

    #[test]
    fn pretty_print_from_a_live_system() {
        let mut system = RedDotSystem::new()
            .with_trace_sink(PrettyPrintSink::with_writer(std::io::sink()));
        system
            .initialize(
                Configuration::new()
                    .with_path(PathDefinition::category("Mail"))
                    .with_path(PathDefinition::leaf("Mail/System")),
            )
            .unwrap();
        let changes = system.set_state("Mail/System", true).unwrap().changes;
        assert_eq!(changes.len(), 3);
    }
}
