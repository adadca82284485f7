// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these are fatal. Configuration errors abort an initialization and
//! leave the previous tree in place; state errors mean a single mutation was
//! ignored.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::registry::SubscriberId;

/// A problem with a single path definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// The same full path is defined more than once.
    #[error("duplicate path `{path}`")]
    DuplicatePath {
        /// The repeated path.
        path: String,
    },
    /// A definition names a parent path that is not defined.
    #[error("parent `{parent}` of path `{path}` is not defined")]
    MissingParent {
        /// The definition declaring the parent.
        path: String,
        /// The undefined parent path.
        parent: String,
    },
    /// A definition has an empty full path, which would name the root.
    #[error("definition {index} has an empty path")]
    EmptyPath {
        /// Position of the definition in authoring order.
        index: usize,
    },
}

/// Every problem found while validating a configuration.
///
/// Validation does not stop at the first error, so this always holds at
/// least one entry and usually all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ConfigError>,
}

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ConfigError>) -> Self {
        debug_assert!(!errors.is_empty(), "validation failure without errors");
        Self { errors }
    }

    /// Returns the individual errors in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns whether the collection holds no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the collection and returns the errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ConfigError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration ({} error(s))", self.errors.len())?;
        for e in &self.errors {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ValidationErrors {}

/// Why a state mutation was ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum StateError {
    /// No node exists at the path.
    #[error("path not found: `{path}`")]
    PathNotFound {
        /// The requested path.
        path: String,
    },
    /// The node has children; its state is derived from them.
    #[error("cannot set state on non-leaf node `{path}`; state is determined by its children")]
    InvalidMutationTarget {
        /// The requested path.
        path: String,
    },
}

impl StateError {
    /// Returns the path the rejected call named.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::PathNotFound { path } | Self::InvalidMutationTarget { path } => path,
        }
    }
}

/// Failure reported by a subscriber while handling a notification.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct SubscriberError {
    message: String,
}

impl SubscriberError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A subscriber failure captured during dispatch.
///
/// Delivery to the other subscribers of the path continues regardless.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("subscriber {subscriber:?} on `{path}` failed: {error}")]
pub struct DispatchFailure {
    /// Path being notified.
    pub path: String,
    /// The failing subscriber.
    pub subscriber: SubscriberId,
    /// What it reported.
    #[source]
    pub error: SubscriberError,
}
