// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static path definitions and their validation.
//!
//! A [`Configuration`] is a flat list of [`PathDefinition`]s, each naming a
//! full path, its parent, and whether it is a leaf. It must pass
//! [`validate`] before a tree is built from it. Trees are built in
//! non-decreasing depth order (see [`Configuration::sorted_by_depth`]) so a
//! parent always exists before its children.
//!
//! With the `serde` feature, both types (and the nested [`DefinitionNode`]
//! form) can be deserialized. Field names are camelCase and everything but
//! `fullPath` is optional:
//!
//! ```json
//! { "paths": [
//!     { "fullPath": "Mail", "isLeaf": false },
//!     { "fullPath": "Mail/System", "parentPath": "Mail" }
//! ] }
//! ```

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{ConfigError, ValidationErrors};
use crate::path;

/// Definition of one path in the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PathDefinition {
    /// Full slash-delimited path, e.g. `"Mail/System"`.
    pub full_path: String,
    /// Path of the parent definition. `None` or empty for top-level paths.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_path: Option<String>,
    /// Whether this path is a leaf, i.e. a valid mutation target.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub is_leaf: bool,
    /// Human-readable documentation. No behavioral effect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Display hint for the binding layer.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub is_visible: bool,
    /// Display priority hint for the binding layer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: i32,
}

#[cfg(feature = "serde")]
const fn default_true() -> bool {
    true
}

impl PathDefinition {
    /// Creates a leaf definition whose parent is derived from the path.
    #[must_use]
    pub fn leaf(full_path: impl Into<String>) -> Self {
        Self::derived(full_path.into(), true)
    }

    /// Creates a non-leaf definition whose parent is derived from the path.
    #[must_use]
    pub fn category(full_path: impl Into<String>) -> Self {
        Self::derived(full_path.into(), false)
    }

    /// Creates a definition with an explicit parent path.
    #[must_use]
    pub fn new(
        full_path: impl Into<String>,
        parent_path: Option<String>,
        is_leaf: bool,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            parent_path,
            is_leaf,
            description: String::new(),
            is_visible: true,
            priority: 0,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the declared parent path, treating an empty one as absent.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Returns the number of segments in the full path.
    #[must_use]
    pub fn depth(&self) -> usize {
        path::depth(&self.full_path)
    }

    /// Returns the last segment of the full path.
    #[must_use]
    pub fn node_name(&self) -> &str {
        path::node_name(&self.full_path)
    }

    fn derived(full_path: String, is_leaf: bool) -> Self {
        let parent_path = path::parent(&full_path)
            .filter(|p| !p.is_empty())
            .map(String::from);
        Self::new(full_path, parent_path, is_leaf)
    }
}

/// Nested definition form: a key with optional children.
///
/// [`Configuration::from_nodes`] flattens a forest of these into path
/// definitions; nodes without children become leaves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DefinitionNode {
    /// Segment name of this node.
    pub key: String,
    /// Human-readable documentation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Child nodes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<DefinitionNode>,
}

/// An ordered set of path definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    /// The definitions, in authoring order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub paths: Vec<PathDefinition>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from definitions.
    #[must_use]
    pub fn from_paths(paths: impl IntoIterator<Item = PathDefinition>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Flattens nested definitions, parents before children.
    #[must_use]
    pub fn from_nodes(nodes: &[DefinitionNode]) -> Self {
        let mut paths = Vec::new();
        let mut stack: Vec<(&DefinitionNode, Option<String>)> =
            nodes.iter().rev().map(|n| (n, None)).collect();
        while let Some((node, parent)) = stack.pop() {
            let full_path = match &parent {
                Some(p) => path::join(p, &node.key),
                None => node.key.clone(),
            };
            for child in node.children.iter().rev() {
                stack.push((child, Some(full_path.clone())));
            }
            paths.push(
                PathDefinition::new(full_path, parent, node.children.is_empty())
                    .with_description(node.description.clone()),
            );
        }
        Self { paths }
    }

    /// Appends a definition.
    #[must_use]
    pub fn with_path(mut self, definition: PathDefinition) -> Self {
        self.paths.push(definition);
        self
    }

    /// Appends a definition.
    pub fn push(&mut self, definition: PathDefinition) {
        self.paths.push(definition);
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns whether there are no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns whether a definition exists for `full_path`.
    #[must_use]
    pub fn has_path(&self, full_path: &str) -> bool {
        self.get(full_path).is_some()
    }

    /// Returns the first definition for `full_path`.
    #[must_use]
    pub fn get(&self, full_path: &str) -> Option<&PathDefinition> {
        self.paths.iter().find(|d| d.full_path == full_path)
    }

    /// Returns the full paths of all leaf definitions, in authoring order.
    pub fn leaf_paths(&self) -> impl Iterator<Item = &str> {
        self.paths
            .iter()
            .filter(|d| d.is_leaf)
            .map(|d| d.full_path.as_str())
    }

    /// Returns the definitions in non-decreasing depth order.
    ///
    /// The sort is stable, so definitions of equal depth keep their authoring
    /// order.
    #[must_use]
    pub fn sorted_by_depth(&self) -> Vec<&PathDefinition> {
        let mut sorted: Vec<_> = self.paths.iter().collect();
        sorted.sort_by_key(|d| d.depth());
        sorted
    }

    /// Validates this configuration. See [`validate`].
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate(&self.paths)
    }
}

/// Checks a set of definitions for empty, duplicate, and orphaned paths.
///
/// A definition with an empty full path would alias the root and yields a
/// [`ConfigError::EmptyPath`]. Every other repeated full path yields a
/// [`ConfigError::DuplicatePath`], and every definition whose non-empty parent
/// path is not itself defined yields a [`ConfigError::MissingParent`]. All
/// errors are collected in that order.
pub fn validate(definitions: &[PathDefinition]) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (index, d) in definitions.iter().enumerate() {
        if d.full_path.is_empty() {
            errors.push(ConfigError::EmptyPath { index });
        }
    }

    let mut seen = BTreeSet::new();
    for d in definitions.iter().filter(|d| !d.full_path.is_empty()) {
        if !seen.insert(d.full_path.as_str()) {
            errors.push(ConfigError::DuplicatePath {
                path: d.full_path.clone(),
            });
        }
    }

    for d in definitions.iter().filter(|d| !d.full_path.is_empty()) {
        if let Some(parent) = d.parent() {
            if !seen.contains(parent) {
                errors.push(ConfigError::MissingParent {
                    path: d.full_path.clone(),
                    parent: String::from(parent),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}
