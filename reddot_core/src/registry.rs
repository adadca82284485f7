// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path-keyed subscriber registry.
//!
//! The registry maps a path string to the subscribers interested in that
//! path's active/inactive state. It knows nothing about the tree: it is keyed
//! by path rather than by node, so subscriptions outlive a rebuild of the
//! tree.
//!
//! Each registration gets its own [`SubscriberId`], so one path can carry any
//! number of independent subscribers and any one of them can be removed
//! without touching the others.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{DispatchFailure, SubscriberError};

/// Receives the aggregate state of one path.
///
/// Closures are registered through [`NotificationRegistry::register`]; this
/// trait is for subscribers that carry their own state.
pub trait Subscriber {
    /// Called with `true` while the path's count is positive.
    ///
    /// Returning an error does not stop delivery to other subscribers; the
    /// failure is handed back to whoever triggered the notification.
    fn on_state(&mut self, active: bool) -> Result<(), SubscriberError>;
}

struct FnSubscriber<F>(F);

impl<F> Subscriber for FnSubscriber<F>
where
    F: FnMut(bool) -> Result<(), SubscriberError>,
{
    fn on_state(&mut self, active: bool) -> Result<(), SubscriberError> {
        (self.0)(active)
    }
}

/// Opaque identity of one registration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Returns the raw value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

struct Entry {
    id: SubscriberId,
    subscriber: Box<dyn Subscriber>,
}

/// Subscribers grouped by the path they listen to.
///
/// Delivery within a path follows registration order. There is no wildcard
/// or prefix matching.
#[derive(Default)]
pub struct NotificationRegistry {
    next_id: u64,
    entries: BTreeMap<String, Vec<Entry>>,
}

impl fmt::Debug for NotificationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(p, v)| (p, v.len())))
            .finish()
    }
}

impl NotificationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback for `path` and returns its identity.
    ///
    /// This does not deliver anything; see
    /// [`RedDotSystem::register`](crate::system::RedDotSystem::register) for
    /// the variant that syncs the subscriber with the current state.
    pub fn register<F>(&mut self, path: &str, callback: F) -> SubscriberId
    where
        F: FnMut(bool) -> Result<(), SubscriberError> + 'static,
    {
        self.register_subscriber(path, FnSubscriber(callback))
    }

    /// Adds a [`Subscriber`] for `path` and returns its identity.
    pub fn register_subscriber(
        &mut self,
        path: &str,
        subscriber: impl Subscriber + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.entry(String::from(path)).or_default().push(Entry {
            id,
            subscriber: Box::new(subscriber),
        });
        id
    }

    /// Removes exactly the subscriber `id` from `path`.
    ///
    /// Returns whether anything was removed. Removing an unknown subscriber
    /// is a no-op.
    pub fn unregister(&mut self, path: &str, id: SubscriberId) -> bool {
        let Some(list) = self.entries.get_mut(path) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| e.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.entries.remove(path);
        }
        removed
    }

    /// Returns whether `id` is registered on `path`.
    #[must_use]
    pub fn is_registered(&self, path: &str, id: SubscriberId) -> bool {
        self.entries
            .get(path)
            .is_some_and(|list| list.iter().any(|e| e.id == id))
    }

    /// Returns the number of subscribers on `path`.
    #[must_use]
    pub fn subscriber_count(&self, path: &str) -> usize {
        self.entries.get(path).map_or(0, Vec::len)
    }

    /// Returns the paths that currently have subscribers, in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Removes every subscriber.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Delivers `active` to every subscriber of `path`.
    ///
    /// Each delivery is independent: a failing subscriber is recorded and the
    /// rest are still called. Returns the failures, if any.
    #[must_use]
    pub fn notify(&mut self, path: &str, active: bool) -> Vec<DispatchFailure> {
        let mut failures = Vec::new();
        let Some(list) = self.entries.get_mut(path) else {
            return failures;
        };
        for entry in list.iter_mut() {
            if let Err(error) = entry.subscriber.on_state(active) {
                failures.push(DispatchFailure {
                    path: String::from(path),
                    subscriber: entry.id,
                    error,
                });
            }
        }
        failures
    }

    /// Delivers `active` to the single subscriber `id` on `path`.
    ///
    /// Does nothing if that subscriber is not registered there.
    pub fn deliver(
        &mut self,
        path: &str,
        id: SubscriberId,
        active: bool,
    ) -> Result<(), DispatchFailure> {
        let Some(entry) = self
            .entries
            .get_mut(path)
            .and_then(|list| list.iter_mut().find(|e| e.id == id))
        else {
            return Ok(());
        };
        entry
            .subscriber
            .on_state(active)
            .map_err(|error| DispatchFailure {
                path: String::from(path),
                subscriber: id,
                error,
            })
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    fn recorder(
        log: &Rc<RefCell<Vec<bool>>>,
    ) -> impl FnMut(bool) -> Result<(), SubscriberError> + 'static {
        let log = Rc::clone(log);
        move |active| {
            log.borrow_mut().push(active);
            Ok(())
        }
    }

    #[test]
    fn notify_reaches_only_the_exact_path() {
        let mut registry = NotificationRegistry::new();
        let mail = Rc::new(RefCell::new(Vec::new()));
        let system = Rc::new(RefCell::new(Vec::new()));
        registry.register("Mail", recorder(&mail));
        registry.register("Mail/System", recorder(&system));

        assert!(registry.notify("Mail/System", true).is_empty());
        assert!(registry.notify("Mail/Sys", true).is_empty());

        assert!(mail.borrow().is_empty());
        assert_eq!(*system.borrow(), vec![true]);
    }

    #[test]
    fn unregister_removes_only_the_matching_subscriber() {
        let mut registry = NotificationRegistry::new();
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let a = registry.register("Shop", recorder(&first));
        let b = registry.register("Shop", recorder(&second));
        assert_ne!(a, b);
        assert_eq!(registry.subscriber_count("Shop"), 2);

        assert!(registry.unregister("Shop", a));
        let _ = registry.notify("Shop", true);

        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![true]);
        assert!(!registry.is_registered("Shop", a));
        assert!(registry.is_registered("Shop", b));
    }

    #[test]
    fn unregister_unknown_is_a_no_op() {
        let mut registry = NotificationRegistry::new();
        let id = registry.register("Shop", |_| Ok(()));
        assert!(!registry.unregister("Mail", id));
        assert!(registry.unregister("Shop", id));
        assert!(!registry.unregister("Shop", id));
    }

    #[test]
    fn empty_paths_are_pruned() {
        let mut registry = NotificationRegistry::new();
        let id = registry.register("Shop", |_| Ok(()));
        registry.register("Mail", |_| Ok(()));
        registry.unregister("Shop", id);
        let paths: Vec<_> = registry.paths().collect();
        assert_eq!(paths, ["Mail"]);
    }

    #[test]
    fn failing_subscriber_does_not_block_others() {
        let mut registry = NotificationRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let bad = registry.register("Mail", |_| Err(SubscriberError::new("view destroyed")));
        registry.register("Mail", recorder(&seen));

        let failures = registry.notify("Mail", true);

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].subscriber, bad);
        assert_eq!(failures[0].path, "Mail");
        assert_eq!(failures[0].error.message(), "view destroyed");
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn deliver_targets_one_subscriber() {
        let mut registry = NotificationRegistry::new();
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        registry.register("Mail", recorder(&first));
        let b = registry.register("Mail", recorder(&second));

        registry.deliver("Mail", b, false).unwrap();
        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![false]);

        // Unknown targets are ignored.
        registry.deliver("Shop", b, true).unwrap();
    }

    #[test]
    fn subscriber_trait_can_be_implemented_directly() {
        struct Badge {
            visible: bool,
        }
        impl Subscriber for Rc<RefCell<Badge>> {
            fn on_state(&mut self, active: bool) -> Result<(), SubscriberError> {
                self.borrow_mut().visible = active;
                Ok(())
            }
        }

        let badge = Rc::new(RefCell::new(Badge { visible: false }));
        let mut registry = NotificationRegistry::new();
        registry.register_subscriber("Mail", Rc::clone(&badge));
        let _ = registry.notify("Mail", true);
        assert!(badge.borrow().visible);
    }
}
