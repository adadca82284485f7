// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated UI session that exercises the red dot pipeline end to end.
//!
//! Loads a nested configuration from JSON, attaches badge views, and plays a
//! short sequence of mail, shop, and achievement events. Every trace event is
//! sent to the `log` facade, printed to stdout, and recorded; the recording is
//! exported as `reddot_trace.json` at the end.
//!
//! Run with `RUST_LOG=reddot=debug` to see the count changes in the log too.

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use reddot_core::shared::{self, AccessError};
use reddot_core::{RedDotSystem, Subscriber, SubscriberError, SubscriberId};

use reddot_debug::log_sink::LogSink;
use reddot_debug::pretty::PrettyPrintSink;
use reddot_debug::recorder::RecorderSink;
use reddot_debug::{dump, json, loader};

const CONFIG: &str = r#"[
  { "key": "Mail", "description": "Inbox", "children": [
      { "key": "System", "description": "Notices from the game" },
      { "key": "Friend", "description": "Messages from friends" }
  ] },
  { "key": "Shop", "children": [
      { "key": "Weapon", "children": [ { "key": "Sword" }, { "key": "Bow" } ] },
      { "key": "Armor" }
  ] },
  { "key": "Achievement" }
]"#;

const TRACE_PATH: &str = "reddot_trace.json";

/// Stand-in for an on-screen badge: shows or hides itself.
struct BadgeView {
    name: &'static str,
    visible: Rc<Cell<bool>>,
}

impl Subscriber for BadgeView {
    fn on_state(&mut self, active: bool) -> Result<(), SubscriberError> {
        if self.visible.replace(active) != active {
            println!("  badge {:<12} {}", self.name, if active { "●" } else { "○" });
        }
        Ok(())
    }
}

/// A badge bound to the shared instance for as long as it lives.
struct SharedBadge {
    path: &'static str,
    id: SubscriberId,
    visible: Rc<Cell<bool>>,
}

impl SharedBadge {
    fn attach(path: &'static str) -> Result<Self, AccessError> {
        let visible = Rc::new(Cell::new(false));
        let sink = Rc::clone(&visible);
        let id = shared::register(path, move |active| {
            sink.set(active);
            Ok(())
        })?;
        Ok(Self { path, id, visible })
    }
}

impl Drop for SharedBadge {
    fn drop(&mut self) {
        shared::unregister(self.path, self.id);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = loader::from_str(CONFIG)?;

    // -- sinks -------------------------------------------------------------
    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    let pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut system =
        RedDotSystem::new().with_trace_sink((LogSink::new(), (pretty, Rc::clone(&recorder))));

    system.initialize(config.clone())?;

    // -- views -------------------------------------------------------------
    let mut badges = Vec::new();
    for name in ["", "Mail", "Mail/System", "Shop", "Shop/Weapon"] {
        let visible = Rc::new(Cell::new(false));
        let label = if name.is_empty() { "<root>" } else { name };
        system.register_subscriber(
            name,
            BadgeView {
                name: label,
                visible: Rc::clone(&visible),
            },
        );
        badges.push((label, visible));
    }
    system.register("Achievement", |active| {
        if active {
            Err(SubscriberError::new("achievement panel not loaded"))
        } else {
            Ok(())
        }
    });

    // -- session -----------------------------------------------------------
    println!("== system mail arrives (twice)");
    system.set_state("Mail/System", true)?;
    system.set_state("Mail/System", true)?;

    println!("== friend mail arrives");
    system.set_state("Mail/Friend", true)?;

    println!("== new gear in the shop");
    system.set_state("Shop/Weapon/Sword", true)?;
    system.set_state("Shop/Armor", true)?;

    println!("== achievement unlocked");
    let result = system.set_state("Achievement", true)?;
    for failure in &result.failures {
        println!("  (ignored) {failure}");
    }

    println!("== features that cannot be set directly");
    if let Err(e) = system.set_state("Shop", true) {
        println!("  {e}");
    }
    if let Err(e) = system.set_state("Guild", true) {
        println!("  {e}");
    }

    println!("\n{}", dump::render(&system));

    println!("== player opens the inbox");
    system.clear("Mail")?;
    println!("== player reads the sword listing");
    system.set_state("Shop/Weapon/Sword", false)?;

    println!("\n{}", dump::render(&system));
    println!("active leaves: {:?}", system.active_leaf_paths());
    for (label, visible) in &badges {
        println!("  {label:<12} visible={}", visible.get());
    }

    // -- shared instance ---------------------------------------------------
    println!("\n== shared instance");
    shared::initialize(config)?;
    {
        let badge = SharedBadge::attach("Mail")?;
        shared::set_state("Mail/Friend", true)?;
        println!("  Mail badge visible={}", badge.visible.get());
    }
    // The badge has been dropped; this notifies nobody.
    shared::set_state("Mail/Friend", false)?;
    shared::teardown()?;

    // -- export ------------------------------------------------------------
    let file = File::create(TRACE_PATH)?;
    let mut writer = BufWriter::new(file);
    let recorder = recorder.borrow();
    json::export(recorder.events(), &mut writer)?;

    log::info!(target: "mailbox_demo", "wrote {TRACE_PATH}");
    println!("Wrote {TRACE_PATH} ({} events)", recorder.events().len());
    Ok(())
}
