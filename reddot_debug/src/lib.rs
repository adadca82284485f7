// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, JSON export, and configuration loading for
//! reddot diagnostics.
//!
//! Trace sinks for [`TraceSink`](reddot_core::trace::TraceSink):
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: owned in-memory recording of every event.
//! - [`log_sink::LogSink`]: forwards events to the `log` facade.
//!
//! Tooling around the core:
//!
//! - [`json::export`]: writes a recording as a JSON array.
//! - [`loader`]: reads a configuration from JSON and validates it.
//! - [`dump::render`]: renders the current tree with its counts.

pub mod dump;
pub mod json;
pub mod loader;
pub mod log_sink;
pub mod pretty;
pub mod recorder;
