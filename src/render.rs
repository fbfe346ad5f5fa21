//! Aligned inline-table rendering of the overrides block.
//!
//! ```text
//! overrides:
//!   axi:          { git: "git@host:ns/axi.git",          version: 0.39.1 }
//!   common_cells: { git: "git@host:ns/common_cells.git", rev: "9f2a" }
//!   tech:         { path: "../tech"                      }
//! ```

use bender_override_policy::{DependencySource, GitRef};
use indexmap::IndexMap;

/// Opening part of the inline table, up to where the alignment padding goes.
fn source_clause(source: &DependencySource) -> String {
    match source {
        DependencySource::Path { path } => format!("{{ path: \"{}\"", path),
        DependencySource::Git {
            url,
            reference: GitRef::Unpinned,
        } => format!("{{ git: \"{}\"", url),
        DependencySource::Git { url, .. } => format!("{{ git: \"{}\",", url),
    }
}

/// Trailing attribute after the padding, if any.
fn pin_attribute(source: &DependencySource) -> Option<String> {
    match source {
        DependencySource::Git {
            reference: GitRef::Version(v),
            ..
        } => Some(format!("version: {}", v)),
        DependencySource::Git {
            reference: GitRef::Revision(r),
            ..
        } => Some(format!("rev: \"{}\"", r)),
        _ => None,
    }
}

fn pad(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.chars().count()))
}

/// Render one line per override, names and closing columns aligned.
pub fn render_override_lines(overrides: &IndexMap<String, DependencySource>) -> Vec<String> {
    let name_width = overrides
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);
    let clause_width = overrides
        .values()
        .map(|source| source_clause(source).chars().count())
        .max()
        .unwrap_or(0);

    overrides
        .iter()
        .map(|(name, source)| {
            let clause = source_clause(source);
            let head = format!(
                "  {}:{} {}{}",
                name,
                pad(name, name_width),
                clause,
                pad(&clause, clause_width)
            );
            match pin_attribute(source) {
                Some(attr) => format!("{} {} }}", head, attr),
                None => format!("{} }}", head),
            }
        })
        .collect()
}

/// The full `overrides:` block, or None when there is nothing to render.
pub fn render_overrides_block(overrides: &IndexMap<String, DependencySource>) -> Option<String> {
    let lines = render_override_lines(overrides);
    if lines.is_empty() {
        return None;
    }
    Some(format!("overrides:\n{}", lines.join("\n")))
}
