//! Override decision types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::source::{DependencySource, Version};

/// Why a lock dependency was (or was not) written into the overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail")]
pub enum OverrideDecision {
    /// No override exists yet for this name.
    #[serde(rename = "NEW")]
    New,

    /// Both pinned to versions and the lock one is strictly greater.
    #[serde(rename = "NEWER_VERSION")]
    NewerVersion { from: Version, to: Version },

    /// Lock has a version, the override only a revision or nothing.
    #[serde(rename = "VERSION_OVER_REVISION")]
    VersionOverRevision,

    /// Both pinned to revisions that differ.
    #[serde(rename = "REVISION_CHANGED")]
    RevisionChanged { from: String, to: String },

    /// Lock has Git, the override points at a local path.
    #[serde(rename = "GIT_OVER_PATH")]
    GitOverPath,

    /// Both pinned to versions, lock one is not greater.
    #[serde(rename = "NOT_NEWER")]
    NotNewer { existing: Version, candidate: Version },

    /// Override has a version; a bare revision never replaces it.
    #[serde(rename = "EXISTING_VERSION")]
    ExistingVersion,

    /// Both pinned to the same revision.
    #[serde(rename = "SAME_REVISION")]
    SameRevision,

    /// Lock source is a local path.
    #[serde(rename = "PATH_CANDIDATE")]
    PathCandidate,

    /// Neither side gives a version, and revisions cannot be compared.
    #[serde(rename = "UNPINNED")]
    Unpinned,
}

impl OverrideDecision {
    /// Whether the lock record replaces (or creates) the override.
    pub fn applies(&self) -> bool {
        matches!(
            self,
            OverrideDecision::New
                | OverrideDecision::NewerVersion { .. }
                | OverrideDecision::VersionOverRevision
                | OverrideDecision::RevisionChanged { .. }
                | OverrideDecision::GitOverPath
        )
    }

    /// Get a machine-readable string representation.
    pub fn to_code(&self) -> String {
        match self {
            OverrideDecision::New => "NEW".to_string(),
            OverrideDecision::NewerVersion { from, to } => {
                format!("NEWER_VERSION:{}->{}", from, to)
            }
            OverrideDecision::VersionOverRevision => "VERSION_OVER_REVISION".to_string(),
            OverrideDecision::RevisionChanged { from, to } => {
                format!("REVISION_CHANGED:{}->{}", from, to)
            }
            OverrideDecision::GitOverPath => "GIT_OVER_PATH".to_string(),
            OverrideDecision::NotNewer {
                existing,
                candidate,
            } => format!("NOT_NEWER:{}>={}", existing, candidate),
            OverrideDecision::ExistingVersion => "EXISTING_VERSION".to_string(),
            OverrideDecision::SameRevision => "SAME_REVISION".to_string(),
            OverrideDecision::PathCandidate => "PATH_CANDIDATE".to_string(),
            OverrideDecision::Unpinned => "UNPINNED".to_string(),
        }
    }

    /// Short human-readable explanation.
    pub fn describe(&self) -> String {
        match self {
            OverrideDecision::New => "added".to_string(),
            OverrideDecision::NewerVersion { from, to } => {
                format!("updated version {} -> {}", from, to)
            }
            OverrideDecision::VersionOverRevision => {
                "updated: version replaces revision".to_string()
            }
            OverrideDecision::RevisionChanged { from, to } => {
                format!("updated revision {} -> {}", from, to)
            }
            OverrideDecision::GitOverPath => "updated: git replaces path".to_string(),
            OverrideDecision::NotNewer {
                existing,
                candidate,
            } => format!("kept version {} (lock has {})", existing, candidate),
            OverrideDecision::ExistingVersion => "kept: existing version wins".to_string(),
            OverrideDecision::SameRevision => "kept: same revision".to_string(),
            OverrideDecision::PathCandidate => "kept: lock source is a path".to_string(),
            OverrideDecision::Unpinned => "kept: nothing to compare".to_string(),
        }
    }
}

/// Decision taken for one undeclared lock dependency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionEntry {
    pub name: String,
    pub decision: OverrideDecision,
}

/// Outcome of comparing the lock against the declared set and current overrides.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Records to add or replace, in lock order.
    pub additions: IndexMap<String, DependencySource>,

    /// One entry per undeclared lock dependency, in lock order.
    pub decisions: Vec<DecisionEntry>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applies() {
        assert!(OverrideDecision::New.applies());
        assert!(OverrideDecision::GitOverPath.applies());
        assert!(!OverrideDecision::SameRevision.applies());
        assert!(!OverrideDecision::PathCandidate.applies());
    }

    #[test]
    fn test_codes() {
        let d = OverrideDecision::NewerVersion {
            from: Version::new("1.0"),
            to: Version::new("1.1"),
        };
        assert_eq!(d.to_code(), "NEWER_VERSION:1.0->1.1");
        assert_eq!(OverrideDecision::Unpinned.to_code(), "UNPINNED");
    }

    #[test]
    fn test_serialization() {
        let entry = DecisionEntry {
            name: "axi".to_string(),
            decision: OverrideDecision::RevisionChanged {
                from: "abc".to_string(),
                to: "def".to_string(),
            },
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("REVISION_CHANGED"));
        assert!(json.contains("\"from\":\"abc\""));
    }
}
