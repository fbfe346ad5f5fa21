//! Rewriting of upstream Git URLs to the internal mirror.

use serde::{Deserialize, Serialize};

/// Upstream organization rewritten by default.
pub const DEFAULT_PATTERN: &str = "github.com/pulp-platform";

/// Internal namespace the default rule points at.
pub const DEFAULT_PREFIX: &str = "git@code.ihep.ac.cn:heris/heris-platform";

/// A single rewrite rule: any URL containing `pattern` becomes
/// `<prefix>/<last path segment of the URL>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorRule {
    pub pattern: String,
    pub prefix: String,
}

impl Default for MirrorRule {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl MirrorRule {
    /// Rewrite `url` if it matches, None otherwise.
    pub fn apply(&self, url: &str) -> Option<String> {
        if !url.contains(&self.pattern) {
            return None;
        }
        let repo = url.rsplit('/').next().unwrap_or(url);
        Some(format!("{}/{}", self.prefix.trim_end_matches('/'), repo))
    }
}

/// Apply the first matching rule, or return the URL unchanged.
pub fn normalize_url(url: &str, rules: &[MirrorRule]) -> String {
    rules
        .iter()
        .find_map(|rule| rule.apply(url))
        .unwrap_or_else(|| url.to_string())
}
