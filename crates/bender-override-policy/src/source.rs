//! Dependency source types.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::PolicyError;

/// Version text as written in a lock file or override entry.
///
/// The literal scalar text is kept, so `version: 1.10` stays `1.10` rather
/// than the float `1.1`. A deserializer that still hands over a typed
/// number gets that number's text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(s: impl Into<String>) -> Self {
        Version(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version(s.to_string())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct VersionVisitor;

impl<'de> Visitor<'de> for VersionVisitor {
    type Value = Version;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a version string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Version, E> {
        Ok(Version(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Version, E> {
        Ok(Version(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Version, E> {
        Ok(Version(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Version, E> {
        Ok(Version(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Version, E> {
        // Debug keeps the trailing ".0" that Display drops
        Ok(Version(format!("{:?}", v)))
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(VersionVisitor)
    }
}

/// What a Git source is pinned to. At most one of version or revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
    Unpinned,
    Version(Version),
    Revision(String),
}

/// Where a dependency comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSource", into = "RawSource")]
pub enum DependencySource {
    Git { url: String, reference: GitRef },
    Path { path: String },
}

impl DependencySource {
    pub fn git(url: impl Into<String>) -> Self {
        DependencySource::Git {
            url: url.into(),
            reference: GitRef::Unpinned,
        }
    }

    pub fn git_version(url: impl Into<String>, version: impl Into<Version>) -> Self {
        DependencySource::Git {
            url: url.into(),
            reference: GitRef::Version(version.into()),
        }
    }

    pub fn git_rev(url: impl Into<String>, rev: impl Into<String>) -> Self {
        DependencySource::Git {
            url: url.into(),
            reference: GitRef::Revision(rev.into()),
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        DependencySource::Path { path: path.into() }
    }

    pub fn version(&self) -> Option<&Version> {
        match self {
            DependencySource::Git {
                reference: GitRef::Version(v),
                ..
            } => Some(v),
            _ => None,
        }
    }

    pub fn revision(&self) -> Option<&str> {
        match self {
            DependencySource::Git {
                reference: GitRef::Revision(r),
                ..
            } => Some(r),
            _ => None,
        }
    }
}

/// Flat inline-table shape of an override entry: `{ git, version | rev }` or `{ path }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
}

impl TryFrom<RawSource> for DependencySource {
    type Error = PolicyError;

    fn try_from(raw: RawSource) -> Result<Self, Self::Error> {
        match (raw.git, raw.path) {
            (Some(url), None) => {
                let reference = match (raw.version, raw.rev) {
                    (Some(_), Some(_)) => return Err(PolicyError::VersionAndRevision(url)),
                    (Some(v), None) => GitRef::Version(v),
                    (None, Some(r)) => GitRef::Revision(r),
                    (None, None) => GitRef::Unpinned,
                };
                Ok(DependencySource::Git { url, reference })
            }
            (None, Some(path)) => {
                if raw.version.is_some() || raw.rev.is_some() {
                    return Err(PolicyError::PinnedPath(path));
                }
                Ok(DependencySource::Path { path })
            }
            (Some(_), Some(_)) => Err(PolicyError::GitAndPath),
            (None, None) => Err(PolicyError::NoSource),
        }
    }
}

impl From<DependencySource> for RawSource {
    fn from(source: DependencySource) -> Self {
        match source {
            DependencySource::Git { url, reference } => {
                let (version, rev) = match reference {
                    GitRef::Unpinned => (None, None),
                    GitRef::Version(v) => (Some(v), None),
                    GitRef::Revision(r) => (None, Some(r)),
                };
                RawSource {
                    git: Some(url),
                    path: None,
                    version,
                    rev,
                }
            }
            DependencySource::Path { path } => RawSource {
                path: Some(path),
                ..Default::default()
            },
        }
    }
}
