//! One reconciliation run: read the three inputs for a label, compute the
//! override additions, splice them into `.bender.yml` and write the result.

use bender_override_policy::{find_missing, merge_overrides, DependencySource, Reconciliation};
use chrono::Utc;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::EffectiveConfig;
use crate::error::Error;
use crate::manifest::{InputFile, LockFile, Manifest, OverrideConfig};
use crate::render::render_overrides_block;
use crate::report::{InputDigest, RunReport};
use crate::splice::splice_overrides;

/// Result of a run: the report and the override file content that was (or would be) written.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub content: String,
}

/// Apply a reconciliation to the raw override file text.
///
/// Nothing to add means the text comes back untouched. Otherwise the existing
/// overrides and the additions are merged, rendered, and spliced over the old
/// `overrides:` block.
pub fn update_override_text(
    text: &str,
    existing: &IndexMap<String, DependencySource>,
    reconciliation: &Reconciliation,
) -> String {
    if reconciliation.is_empty() {
        return text.to_string();
    }

    let merged = merge_overrides(existing, &reconciliation.additions);
    match render_overrides_block(&merged) {
        Some(block) => splice_overrides(text, &block),
        None => text.to_string(),
    }
}

fn require(kind: &'static str, path: &Path) -> Result<(), Error> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingInput {
            kind,
            path: path.to_path_buf(),
        })
    }
}

/// Process the inputs of `label`. With `dry_run` nothing is written.
pub fn process_label(
    label: &str,
    effective: &EffectiveConfig,
    dry_run: bool,
) -> Result<RunOutcome, Error> {
    let config = &effective.config;
    let input_dir = config.input_dir(label);
    let lock_path = input_dir.join(&config.lock_file);
    let manifest_path = input_dir.join(&config.manifest_file);
    let override_path = input_dir.join(&config.override_file);

    require("Lock file", &lock_path)?;
    require("Manifest file", &manifest_path)?;
    require("Override config file", &override_path)?;

    info!("Processing label: {}", label);
    let read = |kind: &'static str, path: &Path| {
        info!("Reading file: {}", path.display());
        InputFile::read(kind, path)
    };
    let lock_file = read("Lock file", &lock_path)?;
    let manifest_file = read("Manifest file", &manifest_path)?;
    let override_file = read("Override config file", &override_path)?;

    let lock: LockFile = lock_file.parse()?;
    let manifest: Manifest = manifest_file.parse()?;
    let overrides: OverrideConfig = override_file.parse()?;

    info!("Extracting dependencies from {}...", config.lock_file);
    let lock_deps = lock.dependencies(&config.mirror);

    info!("Extracting dependencies from {}...", config.manifest_file);
    let declared = manifest.declared_names();

    info!("Extracting existing overrides from {}...", config.override_file);
    let existing = overrides.existing();

    info!("Comparing and finding missing/updated dependencies...");
    let reconciliation = find_missing(&lock_deps, &declared, &existing);
    for entry in &reconciliation.decisions {
        debug!("{}: {}", entry.name, entry.decision.to_code());
    }

    let content = update_override_text(&override_file.text, &existing, &reconciliation);

    let output = config.output_path(label);
    if !dry_run {
        info!("Saving output file: {}", output.display());
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&output, &content).map_err(|e| Error::io(&output, e))?;
    }

    let report = RunReport {
        label: label.to_string(),
        created_at: Utc::now(),
        inputs: [&lock_file, &manifest_file, &override_file]
            .into_iter()
            .map(|f| InputDigest {
                kind: f.kind.to_string(),
                path: f.path.clone(),
                sha256: f.digest(),
            })
            .collect(),
        output,
        written: !dry_run,
        changed: content != override_file.text,
        lock_dependencies: lock_deps.len(),
        manifest_dependencies: declared.len(),
        existing_overrides: existing.len(),
        updated: reconciliation.additions.keys().cloned().collect(),
        decisions: reconciliation.decisions,
        config_sources: effective.sources.clone(),
    };

    Ok(RunOutcome { report, content })
}
