//! Loaders for `Bender.lock`, `Bender.yml` and `.bender.yml`.

use bender_override_policy::{normalize_url, DependencySource, MirrorRule, Version};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Error;

/// An input file read into memory.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub kind: &'static str,
    pub path: PathBuf,
    pub text: String,
}

impl InputFile {
    pub fn read(kind: &'static str, path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self {
            kind,
            path: path.to_path_buf(),
            text,
        })
    }

    /// Hex SHA-256 of the file contents.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Parse the file as YAML. A file with no content yields the default value.
    pub fn parse<T: DeserializeOwned + Default>(&self) -> Result<T, Error> {
        parse_yaml(&self.text).map_err(|source| Error::Yaml {
            path: self.path.clone(),
            source,
        })
    }
}

/// Parse a YAML document, treating blank or comment-only text as empty.
pub fn parse_yaml<T: DeserializeOwned + Default>(text: &str) -> Result<T, serde_yaml::Error> {
    let has_content = text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#') && line != "---"
    });
    if !has_content {
        return Ok(T::default());
    }
    serde_yaml::from_str(text)
}

/// `Bender.lock`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockFile {
    #[serde(default)]
    pub packages: Option<IndexMap<String, LockedPackage>>,
}

/// One resolved package in the lock file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockedPackage {
    #[serde(default, deserialize_with = "scalar_text")]
    pub revision: Option<String>,

    #[serde(default)]
    pub version: Option<Version>,

    #[serde(default)]
    pub source: Option<LockSource>,
}

// Revisions are hex, so an all-digit one reads as a YAML number
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Version> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| v.as_str().to_string()))
}

/// `source:` of a locked package. Kinds other than Git and Path are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockSource {
    #[serde(rename = "Git", default)]
    pub git: Option<String>,

    #[serde(rename = "Path", default)]
    pub path: Option<String>,
}

/// `Bender.yml`; only the dependency names matter here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: Option<IndexMap<String, serde_yaml::Value>>,
}

/// `.bender.yml`; only the overrides are read structurally.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideConfig {
    #[serde(default)]
    pub overrides: Option<IndexMap<String, DependencySource>>,
}

impl LockFile {
    /// Normalized dependency records, in lock order.
    ///
    /// Git URLs go through the mirror rules. A Git package pins its version
    /// when it has one, otherwise its revision. Packages with neither a Git
    /// nor a Path source are skipped.
    pub fn dependencies(&self, rules: &[MirrorRule]) -> IndexMap<String, DependencySource> {
        let mut records = IndexMap::new();
        let Some(packages) = &self.packages else {
            return records;
        };

        for (name, package) in packages {
            let source = package.source.as_ref();
            let record = if let Some(url) = source.and_then(|s| s.git.as_ref()) {
                let url = normalize_url(url, rules);
                match (&package.version, &package.revision) {
                    (Some(version), _) => DependencySource::git_version(url, version.clone()),
                    (None, Some(rev)) => DependencySource::git_rev(url, rev.clone()),
                    (None, None) => DependencySource::git(url),
                }
            } else if let Some(path) = source.and_then(|s| s.path.as_ref()) {
                DependencySource::path(path.clone())
            } else {
                debug!("Skipping {}: no Git or Path source", name);
                continue;
            };
            records.insert(name.clone(), record);
        }

        records
    }
}

impl Manifest {
    /// Names of the directly declared dependencies.
    pub fn declared_names(&self) -> HashSet<String> {
        self.dependencies
            .as_ref()
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl OverrideConfig {
    /// Current overrides, in file order.
    pub fn existing(&self) -> IndexMap<String, DependencySource> {
        self.overrides.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCK: &str = r#"
packages:
  axi:
    revision: fccffb5953ec8564218ba05e20adbedec845e014
    version: 0.39.1
    source:
      Git: https://github.com/pulp-platform/axi.git
    dependencies:
    - common_cells
  cva6:
    revision: 9d2b0b1c2a6e7b7f
    version: null
    source:
      Git: https://github.com/openhwgroup/cva6.git
    dependencies: []
  numeric_rev:
    revision: 1234567
    source:
      Git: https://example.com/numeric_rev.git
  bare:
    revision: null
    version: null
    source:
      Git: https://github.com/pulp-platform/bare
    dependencies: []
  local_ip:
    revision: null
    version: null
    source:
      Path: ../local_ip
    dependencies: []
  registry_thing:
    revision: null
    version: 1.0.0
    source:
      Registry: somewhere
    dependencies: []
"#;

    #[test]
    fn test_lock_extraction() {
        let lock: LockFile = parse_yaml(LOCK).unwrap();
        let deps = lock.dependencies(&[MirrorRule::default()]);

        let names: Vec<&str> = deps.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["axi", "cva6", "numeric_rev", "bare", "local_ip"]);
        assert_eq!(deps["numeric_rev"].revision(), Some("1234567"));

        assert_eq!(
            deps["axi"],
            DependencySource::git_version(
                "git@code.ihep.ac.cn:heris/heris-platform/axi.git",
                "0.39.1"
            )
        );
        assert_eq!(
            deps["cva6"],
            DependencySource::git_rev("https://github.com/openhwgroup/cva6.git", "9d2b0b1c2a6e7b7f")
        );
        assert_eq!(
            deps["bare"],
            DependencySource::git("git@code.ihep.ac.cn:heris/heris-platform/bare")
        );
        assert_eq!(deps["local_ip"], DependencySource::path("../local_ip"));
    }

    #[test]
    fn test_lock_dependency_lists_are_not_interpreted() {
        let lock: LockFile = parse_yaml(
            r#"
packages:
  axi:
    version: 0.39.1
    source:
      Git: https://github.com/pulp-platform/axi.git
    dependencies:
      common_cells: { version: 1.33.0 }
"#,
        )
        .unwrap();
        let deps = lock.dependencies(&[]);
        assert_eq!(deps["axi"].version(), Some(&Version::from("0.39.1")));
    }

    #[test]
    fn test_lock_without_packages() {
        let lock: LockFile = parse_yaml("other: 1\n").unwrap();
        assert!(lock.dependencies(&[]).is_empty());
    }

    #[test]
    fn test_manifest_names() {
        let manifest: Manifest = parse_yaml(
            r#"
package:
  name: heris_soc
dependencies:
  axi: { git: "https://github.com/pulp-platform/axi.git", version: 0.39.1 }
  common_cells: { git: "https://github.com/pulp-platform/common_cells.git", rev: "abc" }
"#,
        )
        .unwrap();
        let names = manifest.declared_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains("axi"));
        assert!(names.contains("common_cells"));
    }

    #[test]
    fn test_manifest_without_dependencies() {
        let manifest: Manifest = parse_yaml("package:\n  name: x\ndependencies:\n").unwrap();
        assert!(manifest.declared_names().is_empty());
    }

    #[test]
    fn test_override_config() {
        let config: OverrideConfig = parse_yaml(
            r#"
overrides:
  axi:  { git: "git@host:ns/axi.git", version: 0.38.0 }
  tech: { path: "../tech" }
exports:
  - foo
"#,
        )
        .unwrap();
        let existing = config.existing();
        assert_eq!(existing.len(), 2);
        assert_eq!(existing["tech"], DependencySource::path("../tech"));
        assert_eq!(existing["axi"].version().unwrap().as_str(), "0.38.0");
    }

    #[test]
    fn test_empty_and_comment_only_documents() {
        let config: OverrideConfig = parse_yaml("").unwrap();
        assert!(config.existing().is_empty());
        let config: OverrideConfig = parse_yaml("# nothing here\n\n").unwrap();
        assert!(config.existing().is_empty());
    }

    #[test]
    fn test_malformed_override_entry() {
        let result: Result<OverrideConfig, _> = parse_yaml("overrides:\n  axi: { url: \"x\" }\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_input_file_digest() {
        let file = InputFile {
            kind: "Lock file",
            path: PathBuf::from("Bender.lock"),
            text: String::new(),
        };
        assert_eq!(
            file.digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
