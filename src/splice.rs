//! Block-level splicing of YAML text.
//!
//! The document is cut into top-level blocks: a zero-indentation `key:` line
//! plus every following line up to the next such line. Comments and blank
//! lines belong to the block above them. Replacing a block leaves every other
//! byte of the document as it was.

use regex_lite::Regex;
use std::sync::OnceLock;
use tracing::warn;

/// Zero-indentation mapping key, e.g. `overrides:` or `exports: []`.
const TOP_LEVEL_KEY: &str = r"^([A-Za-z_][A-Za-z0-9_.-]*)[ \t]*:(\s|$)";

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOP_LEVEL_KEY).expect("top-level key pattern is valid"))
}

fn top_level_key(line: &str) -> Option<&str> {
    key_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// One top-level section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// None for the text before the first key.
    pub key: Option<&'a str>,
    pub text: &'a str,
}

/// Cut `text` into top-level blocks. Concatenating the blocks gives back `text`.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut key = None;
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if let Some(next) = top_level_key(line) {
            if offset > start || key.is_some() {
                blocks.push(Block {
                    key,
                    text: &text[start..offset],
                });
            }
            key = Some(next);
            start = offset;
        }
        offset += line.len();
    }

    if offset > start || key.is_some() {
        blocks.push(Block {
            key,
            text: &text[start..offset],
        });
    }

    blocks
}

/// Replace the first top-level block named `key` with `replacement`.
///
/// The line break that ended the old block is kept. Returns None when the
/// document has no such key.
pub fn replace_block(text: &str, key: &str, replacement: &str) -> Option<String> {
    let blocks = split_blocks(text);
    let target = blocks.iter().position(|b| b.key == Some(key))?;

    let mut out = String::with_capacity(text.len() + replacement.len());
    for (i, block) in blocks.iter().enumerate() {
        if i == target {
            out.push_str(replacement);
            if block.text.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(block.text);
        }
    }
    Some(out)
}

/// Swap the `overrides:` block of `text` for `block`.
///
/// A document without an `overrides:` key is returned unchanged.
pub fn splice_overrides(text: &str, block: &str) -> String {
    match replace_block(text, "overrides", block) {
        Some(updated) => updated,
        None => {
            warn!("No top-level 'overrides:' key found, leaving the file unchanged");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# local configuration
package:
  name: soc

overrides:
  a: { path: \"old\" }
  # pinned by hand
  b: { git: \"x\", rev: \"1\" }
exports:
  overrides: nested
  foo: bar
";

    #[test]
    fn test_split_roundtrip() {
        let blocks = split_blocks(DOC);
        let keys: Vec<Option<&str>> = blocks.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec![None, Some("package"), Some("overrides"), Some("exports")]);

        let joined: String = blocks.iter().map(|b| b.text).collect();
        assert_eq!(joined, DOC);
    }

    #[test]
    fn test_replace_only_overrides_block() {
        let out = splice_overrides(DOC, "overrides:\n  c: { path: \"new\" }");

        let head = "# local configuration\npackage:\n  name: soc\n\n";
        let tail = "exports:\n  overrides: nested\n  foo: bar\n";
        assert_eq!(
            out,
            format!("{}overrides:\n  c: {{ path: \"new\" }}\n{}", head, tail)
        );
    }

    #[test]
    fn test_block_at_end_keeps_trailing_newline() {
        let text = "package:\n  name: x\noverrides:\n  a: { path: \"p\" }\n";
        let out = splice_overrides(text, "overrides:\n  b: { path: \"q\" }");
        assert_eq!(out, "package:\n  name: x\noverrides:\n  b: { path: \"q\" }\n");
    }

    #[test]
    fn test_block_at_end_without_newline() {
        let text = "overrides:\n  a: { path: \"p\" }";
        let out = splice_overrides(text, "overrides:\n  b: { path: \"q\" }");
        assert_eq!(out, "overrides:\n  b: { path: \"q\" }");
    }

    #[test]
    fn test_missing_key_leaves_text_unchanged() {
        let text = "package:\n  name: x\nexports:\n  - y\n";
        assert_eq!(splice_overrides(text, "overrides:\n  a: { path: \"p\" }"), text);
    }

    #[test]
    fn test_indented_key_is_not_top_level() {
        let text = "exports:\n  overrides: nested\n";
        assert!(replace_block(text, "overrides", "overrides:").is_none());
    }

    #[test]
    fn test_only_first_block_replaced() {
        let text = "overrides:\n  a: 1\nother: 2\noverrides:\n  b: 3\n";
        let out = replace_block(text, "overrides", "overrides:\n  z: 0").unwrap();
        assert_eq!(out, "overrides:\n  z: 0\nother: 2\noverrides:\n  b: 3\n");
    }

    #[test]
    fn test_key_detection() {
        assert_eq!(top_level_key("overrides:\n"), Some("overrides"));
        assert_eq!(top_level_key("overrides: {}\n"), Some("overrides"));
        assert_eq!(top_level_key("vendor_package:"), Some("vendor_package"));
        assert_eq!(top_level_key("  overrides:\n"), None);
        assert_eq!(top_level_key("# overrides:\n"), None);
        assert_eq!(top_level_key("https://example.com\n"), None);
        assert_eq!(top_level_key("- item\n"), None);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_blocks("").is_empty());
        assert_eq!(splice_overrides("", "overrides:"), "");
    }
}
