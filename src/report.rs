//! Summary of one reconciliation run.

use bender_override_policy::DecisionEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::ConfigSource;

/// An input file with its content digest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputDigest {
    pub kind: String,
    pub path: PathBuf,
    pub sha256: String,
}

/// What a run read, decided and wrote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub label: String,

    pub created_at: DateTime<Utc>,

    pub inputs: Vec<InputDigest>,

    pub output: PathBuf,

    /// False for dry runs
    pub written: bool,

    /// Whether the output differs from the input override file
    pub changed: bool,

    /// Dependencies resolved in the lock file
    pub lock_dependencies: usize,

    /// Dependencies declared in the manifest
    pub manifest_dependencies: usize,

    /// Overrides present before the run
    pub existing_overrides: usize,

    /// Overrides added or replaced
    pub updated: Vec<String>,

    /// Decision for every undeclared lock dependency, in lock order
    pub decisions: Vec<DecisionEntry>,

    pub config_sources: Vec<ConfigSource>,
}

impl RunReport {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary
    pub fn to_human(&self) -> String {
        let mut output = String::new();

        if self.updated.is_empty() {
            output.push_str("No new dependencies to add.\n");
        } else {
            output.push_str(&format!(
                "Found {} dependencies to add/update in overrides:\n",
                self.updated.len()
            ));
            for entry in self.decisions.iter().filter(|e| e.decision.applies()) {
                output.push_str(&format!("  - {} ({})\n", entry.name, entry.decision.describe()));
            }
        }

        let kept: Vec<&DecisionEntry> = self
            .decisions
            .iter()
            .filter(|e| !e.decision.applies())
            .collect();
        if !kept.is_empty() {
            output.push_str("Existing overrides kept:\n");
            for entry in kept {
                output.push_str(&format!("  - {} ({})\n", entry.name, entry.decision.describe()));
            }
        }

        if self.written {
            output.push_str(&format!(
                "Processing complete! Output file: {}\n",
                self.output.display()
            ));
        } else {
            output.push_str(&format!(
                "Dry run, not written: {}\n",
                self.output.display()
            ));
        }
        output.push_str(&format!(
            "Total dependencies in lock: {}\n",
            self.lock_dependencies
        ));
        output.push_str(&format!(
            "Dependencies in Bender.yml: {}\n",
            self.manifest_dependencies
        ));
        output.push_str(&format!(
            "Added/updated in overrides: {}",
            self.updated.len()
        ));

        output
    }
}
