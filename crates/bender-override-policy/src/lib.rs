//! Override policy for Bender lock dependencies.
//!
//! Given the resolved lock records, the names declared in `Bender.yml` and the
//! overrides already present in `.bender.yml`, decide which lock records must
//! be written into the overrides, and why.

mod decision;
mod mirror;
mod source;
mod version;

pub use decision::{DecisionEntry, OverrideDecision, Reconciliation};
pub use mirror::{normalize_url, MirrorRule, DEFAULT_PATTERN, DEFAULT_PREFIX};
pub use source::{DependencySource, GitRef, RawSource, Version};
pub use version::{compare_version_str, compare_versions};

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Error types for malformed dependency sources.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("entry has neither 'git' nor 'path'")]
    NoSource,

    #[error("entry has both 'git' and 'path'")]
    GitAndPath,

    #[error("git source '{0}' has both 'version' and 'rev'")]
    VersionAndRevision(String),

    #[error("path source '{0}' cannot carry 'version' or 'rev'")]
    PinnedPath(String),
}

/// Decide whether `candidate` (from the lock) replaces `existing` (from the overrides).
///
/// One arm per row of the precedence table: versions beat revisions, Git
/// beats Path, and anything else keeps the existing entry.
pub fn decide(candidate: &DependencySource, existing: &DependencySource) -> OverrideDecision {
    use DependencySource::{Git, Path};
    use GitRef::{Revision, Unpinned};

    match (candidate, existing) {
        (
            Git {
                reference: GitRef::Version(new),
                ..
            },
            Git {
                reference: GitRef::Version(old),
                ..
            },
        ) => {
            if compare_versions(Some(new), Some(old)) == Ordering::Greater {
                OverrideDecision::NewerVersion {
                    from: old.clone(),
                    to: new.clone(),
                }
            } else {
                OverrideDecision::NotNewer {
                    existing: old.clone(),
                    candidate: new.clone(),
                }
            }
        }
        (
            Git {
                reference: GitRef::Version(_),
                ..
            },
            Git {
                reference: Revision(_) | Unpinned,
                ..
            },
        ) => OverrideDecision::VersionOverRevision,
        (
            Git {
                reference: Revision(_) | Unpinned,
                ..
            },
            Git {
                reference: GitRef::Version(_),
                ..
            },
        ) => OverrideDecision::ExistingVersion,
        (
            Git {
                reference: Revision(new),
                ..
            },
            Git {
                reference: Revision(old),
                ..
            },
        ) => {
            if new != old {
                OverrideDecision::RevisionChanged {
                    from: old.clone(),
                    to: new.clone(),
                }
            } else {
                OverrideDecision::SameRevision
            }
        }
        (Git { .. }, Path { .. }) => OverrideDecision::GitOverPath,
        (
            Git {
                reference: Revision(_) | Unpinned,
                ..
            },
            Git {
                reference: Revision(_) | Unpinned,
                ..
            },
        ) => OverrideDecision::Unpinned,
        (Path { .. }, _) => OverrideDecision::PathCandidate,
    }
}

/// Find lock records that are neither declared nor already covered by an
/// equal-or-better override.
pub fn find_missing(
    lock: &IndexMap<String, DependencySource>,
    declared: &HashSet<String>,
    existing: &IndexMap<String, DependencySource>,
) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (name, candidate) in lock {
        if declared.contains(name) {
            continue;
        }

        let decision = match existing.get(name) {
            Some(current) => decide(candidate, current),
            None => OverrideDecision::New,
        };

        if decision.applies() {
            result.additions.insert(name.clone(), candidate.clone());
        }
        result.decisions.push(DecisionEntry {
            name: name.clone(),
            decision,
        });
    }

    result
}

/// Merge additions into the existing overrides.
///
/// Replaced names keep their original position; new names are appended.
pub fn merge_overrides(
    existing: &IndexMap<String, DependencySource>,
    additions: &IndexMap<String, DependencySource>,
) -> IndexMap<String, DependencySource> {
    let mut merged = existing.clone();
    for (name, source) in additions {
        merged.insert(name.clone(), source.clone());
    }
    merged
}
