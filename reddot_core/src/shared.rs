// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A process-wide (per-thread) [`RedDotSystem`].
//!
//! UI code often has no convenient place to thread a context object through,
//! so this module keeps one system per thread and exposes free functions over
//! it. The instance is created lazily on first use.
//!
//! Subscribers run while the instance is borrowed. Calling back into this
//! module from inside a subscriber returns [`AccessError::Reentrant`] instead
//! of deadlocking or panicking.
//!
//! [`unregister`] is the exception: called from a subscriber, the removal is
//! queued and applied as soon as the outer call finishes. It is also safe to
//! call from destructors, including during thread teardown after the instance
//! is gone.

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use thiserror::Error;

use crate::config::Configuration;
use crate::error::{StateError, SubscriberError, ValidationErrors};
use crate::registry::SubscriberId;
use crate::system::{Propagation, RedDotSystem};

std::thread_local! {
    static INSTANCE: RefCell<RedDotSystem> = RefCell::new(RedDotSystem::new());
    static PENDING: RefCell<Vec<(String, SubscriberId)>> = const { RefCell::new(Vec::new()) };
}

/// Why the shared instance could not be reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum AccessError {
    /// The instance is already in use further up the stack, typically from
    /// within a subscriber.
    #[error("shared red dot system is already borrowed")]
    Reentrant,
    /// The thread is shutting down and the instance has been dropped.
    #[error("shared red dot system has been destroyed")]
    Destroyed,
}

/// Runs `f` with exclusive access to this thread's instance.
///
/// Removals queued by [`unregister`] while `f` ran are applied before the
/// instance is released.
pub fn with<R>(f: impl FnOnce(&mut RedDotSystem) -> R) -> Result<R, AccessError> {
    INSTANCE
        .try_with(|cell| {
            let mut system = cell.try_borrow_mut().map_err(|_| AccessError::Reentrant)?;
            let out = f(&mut system);
            apply_pending(&mut system);
            Ok(out)
        })
        .map_err(|_| AccessError::Destroyed)?
}

fn apply_pending(system: &mut RedDotSystem) {
    let pending = PENDING
        .try_with(|queue| core::mem::take(&mut *queue.borrow_mut()))
        .unwrap_or_default();
    for (path, id) in pending {
        system.unregister(&path, id);
    }
}

/// Errors from the shared-instance wrappers that can also fail on their own.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SharedError<E> {
    /// The instance could not be reached.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// The operation itself failed.
    #[error("{0}")]
    Operation(E),
}

fn flatten<T, E>(r: Result<Result<T, E>, AccessError>) -> Result<T, SharedError<E>> {
    match r {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(SharedError::Operation(e)),
        Err(e) => Err(SharedError::Access(e)),
    }
}

/// See [`RedDotSystem::initialize`].
pub fn initialize(config: Configuration) -> Result<(), SharedError<ValidationErrors>> {
    flatten(with(|s| s.initialize(config)))
}

/// See [`RedDotSystem::reload`].
pub fn reload() -> Result<(), SharedError<ValidationErrors>> {
    flatten(with(RedDotSystem::reload))
}

/// See [`RedDotSystem::set_state`].
pub fn set_state(path: &str, active: bool) -> Result<Propagation, SharedError<StateError>> {
    flatten(with(|s| s.set_state(path, active)))
}

/// See [`RedDotSystem::clear`].
pub fn clear(path: &str) -> Result<Propagation, SharedError<StateError>> {
    flatten(with(|s| s.clear(path)))
}

/// See [`RedDotSystem::count`].
pub fn count(path: &str) -> Result<u32, AccessError> {
    with(|s| s.count(path))
}

/// See [`RedDotSystem::is_active`].
pub fn is_active(path: &str) -> Result<bool, AccessError> {
    with(|s| s.is_active(path))
}

/// See [`RedDotSystem::register`].
pub fn register<F>(path: &str, callback: F) -> Result<SubscriberId, AccessError>
where
    F: FnMut(bool) -> Result<(), SubscriberError> + 'static,
{
    with(|s| s.register(path, callback))
}

/// Removes a subscriber from the shared instance.
///
/// Returns whether it was registered. Never fails. From inside a subscriber
/// the removal is queued until the running call returns, and `true` is
/// returned; the subscriber may still see the rest of that call's
/// notifications. Once the instance is destroyed nothing happens and `false`
/// is returned.
pub fn unregister(path: &str, id: SubscriberId) -> bool {
    match with(|s| s.unregister(path, id)) {
        Ok(removed) => removed,
        Err(AccessError::Reentrant) => PENDING
            .try_with(|queue| queue.borrow_mut().push((path.into(), id)))
            .is_ok(),
        Err(AccessError::Destroyed) => false,
    }
}

/// Resets this thread's instance to an uninitialized state.
pub fn teardown() -> Result<(), AccessError> {
    with(RedDotSystem::reset)
}
