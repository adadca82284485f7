// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slash-delimited path helpers.
//!
//! A path such as `"Mail/System"` names a node by the keys along the way from
//! the root. The empty path names the root itself.

use alloc::string::String;

/// Separator between path segments.
pub const DELIMITER: char = '/';

/// Returns an iterator over the segments of `path`.
///
/// The empty path has no segments. Empty segments inside a non-empty path
/// (e.g. `"a//b"`) are yielded as-is.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    let mut parts = path.split(DELIMITER);
    if path.is_empty() {
        // `split` yields one empty item for an empty string.
        _ = parts.next();
    }
    parts
}

/// Returns the number of segments in `path` (0 for the root).
#[must_use]
pub fn depth(path: &str) -> usize {
    segments(path).count()
}

/// Returns the last segment of `path`, or `""` for the root.
#[must_use]
pub fn node_name(path: &str) -> &str {
    match path.rfind(DELIMITER) {
        Some(i) => &path[i + DELIMITER.len_utf8()..],
        None => path,
    }
}

/// Returns the path of the parent of `path`.
///
/// Top-level paths have the root (`""`) as parent; the root has none.
#[must_use]
pub fn parent(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(match path.rfind(DELIMITER) {
        Some(i) => &path[..i],
        None => "",
    })
}

/// Returns whether `path` equals `prefix` or lies beneath it.
///
/// Every path lies beneath the root prefix `""`. Matching is per segment, so
/// `"Mail/System"` is within `"Mail"` but `"Mailbox"` is not.
#[must_use]
pub fn is_within(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(DELIMITER),
        None => false,
    }
}

/// Appends `key` to `parent`.
#[must_use]
pub fn join(parent: &str, key: &str) -> String {
    let mut out = String::with_capacity(parent.len() + key.len() + 1);
    if !parent.is_empty() {
        out.push_str(parent);
        out.push(DELIMITER);
    }
    out.push_str(key);
    out
}
