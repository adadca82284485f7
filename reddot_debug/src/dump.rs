// Copyright 2026 the RedDot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text rendering of the current tree state.
//!
//! One line per node, depth-first with children in key order, indented two
//! spaces per level. The root comes first as `<root>`. A positive count is
//! shown in brackets and configured leaves are marked `(leaf)`:
//!
//! ```text
//! <root> [1]
//!   Mail [1]
//!     Friend (leaf)
//!     System [2] (leaf)
//!   Shop
//!     Armor (leaf)
//! ```

use std::fmt::{self, Write};

use reddot_core::RedDotSystem;

use crate::pretty::display_path;

/// Writes the tree of `system` to `out`.
pub fn write_tree(system: &RedDotSystem, out: &mut impl Write) -> fmt::Result {
    let tree = system.tree();
    let config = system.configuration();
    for id in tree.subtree(tree.root()) {
        let depth = tree.depth(id);
        let label = if id == tree.root() {
            display_path("")
        } else {
            tree.key(id)
        };
        write!(out, "{:indent$}{label}", "", indent = depth * 2)?;
        let count = tree.count(id);
        if count > 0 {
            write!(out, " [{count}]")?;
        }
        let path = tree.full_path(id);
        if config
            .and_then(|c| c.get(path))
            .is_some_and(|d| d.is_leaf)
        {
            out.write_str(" (leaf)")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Renders the tree of `system` to a string.
#[must_use]
pub fn render(system: &RedDotSystem) -> String {
    let mut out = String::new();
    // Writing to a `String` cannot fail.
    let _ = write_tree(system, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use reddot_core::{Configuration, PathDefinition};

    use super::*;

    fn system() -> RedDotSystem {
        let mut system = RedDotSystem::new();
        system
            .initialize(
                Configuration::new()
                    .with_path(PathDefinition::category("Mail"))
                    .with_path(PathDefinition::leaf("Mail/System"))
                    .with_path(PathDefinition::leaf("Mail/Friend"))
                    .with_path(PathDefinition::category("Shop"))
                    .with_path(PathDefinition::leaf("Shop/Armor")),
            )
            .unwrap();
        system
    }

    #[test]
    fn render_idle_tree() {
        assert_eq!(
            render(&system()),
            "<root>\n  Mail\n    Friend (leaf)\n    System (leaf)\n  Shop\n    Armor (leaf)\n"
        );
    }

    #[test]
    fn render_shows_positive_counts() {
        let mut system = system();
        system.set_state("Mail/System", true).unwrap();
        system.set_state("Mail/System", true).unwrap();
        let text = render(&system);
        assert!(text.starts_with("<root> [1]\n  Mail [1]\n"), "got: {text}");
        assert!(text.contains("    System [2] (leaf)\n"), "got: {text}");
        assert!(text.contains("  Shop\n"), "got: {text}");
    }

    #[test]
    fn render_uninitialized() {
        assert_eq!(render(&RedDotSystem::new()), "<root>\n");
    }
}
