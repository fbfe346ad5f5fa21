//! Built-in defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use bender_override_policy::MirrorRule;
use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Directory holding one sub-directory per label (default: "input/filepack")
    pub input_root: String,

    /// Directory the rewritten override file goes to (default: "output/filepackout")
    pub output_root: String,

    /// Lock file name inside the label directory (default: "Bender.lock")
    pub lock_file: String,

    /// Manifest file name inside the label directory (default: "Bender.yml")
    pub manifest_file: String,

    /// Override config file name, input and output (default: ".bender.yml")
    pub override_file: String,

    /// URL rewrite rules (default: pulp-platform -> IHEP mirror)
    pub mirror: Vec<MirrorRule>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            input_root: "input/filepack".to_string(),
            output_root: "output/filepackout".to_string(),
            lock_file: "Bender.lock".to_string(),
            manifest_file: "Bender.yml".to_string(),
            override_file: ".bender.yml".to_string(),
            mirror: vec![MirrorRule::default()],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "input_root": self.input_root,
            "output_root": self.output_root,
            "lock_file": self.lock_file,
            "manifest_file": self.manifest_file,
            "override_file": self.override_file,
            "mirror": self.mirror,
        })
    }
}
