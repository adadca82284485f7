// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading configurations from JSON.
//!
//! Two document shapes are accepted:
//!
//! - an object with a flat `"paths"` list of path definitions;
//! - an array of nested nodes, each with a `"key"`, an optional
//!   `"description"`, and optional `"children"`. Childless nodes become
//!   leaves.
//!
//! ```json
//! [
//!   { "key": "Mail", "children": [ { "key": "System" }, { "key": "Friend" } ] }
//! ]
//! ```
//!
//! Every loaded configuration is validated before it is returned.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use reddot_core::{Configuration, DefinitionNode, ValidationErrors};

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be read.
    #[error("failed to read configuration")]
    Io(#[from] io::Error),
    /// The text is not a valid configuration document.
    #[error("malformed configuration document")]
    Json(#[from] serde_json::Error),
    /// The document parsed but failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// Parses and validates a configuration from JSON text.
pub fn from_str(text: &str) -> Result<Configuration, LoadError> {
    from_value(serde_json::from_str(text)?)
}

/// Parses and validates a configuration from a reader.
pub fn from_reader(reader: impl Read) -> Result<Configuration, LoadError> {
    from_value(serde_json::from_reader(reader)?)
}

/// Reads, parses, and validates the configuration file at `path`.
pub fn from_path(path: impl AsRef<Path>) -> Result<Configuration, LoadError> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

fn from_value(value: Value) -> Result<Configuration, LoadError> {
    let config = if value.is_array() {
        let nodes: Vec<DefinitionNode> = serde_json::from_value(value)?;
        Configuration::from_nodes(&nodes)
    } else {
        serde_json::from_value(value)?
    };
    config.validate()?;
    Ok(config)
}
