//! Effective configuration with provenance
//!
//! Captures the merged tool configuration plus where each layer came from.

use bender_override_policy::MirrorRule;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Config file picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "bender-overrides.toml";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Resolved tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub lock_file: String,
    pub manifest_file: String,
    pub override_file: String,
    pub mirror: Vec<MirrorRule>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let d = BuiltinDefaults::default();
        Self {
            input_root: PathBuf::from(d.input_root),
            output_root: PathBuf::from(d.output_root),
            lock_file: d.lock_file,
            manifest_file: d.manifest_file,
            override_file: d.override_file,
            mirror: d.mirror,
        }
    }
}

impl ToolConfig {
    /// Directory holding the inputs for `label`
    pub fn input_dir(&self, label: &str) -> PathBuf {
        self.input_root.join(label)
    }

    /// Path of the rewritten override file for `label`
    pub fn output_path(&self, label: &str) -> PathBuf {
        self.output_root.join(label).join(&self.override_file)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.input_root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "input_root cannot be empty".to_string(),
            ));
        }
        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "output_root cannot be empty".to_string(),
            ));
        }

        for (key, name) in [
            ("lock_file", &self.lock_file),
            ("manifest_file", &self.manifest_file),
            ("override_file", &self.override_file),
        ] {
            if name.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} cannot be empty",
                    key
                )));
            }
        }

        for (i, rule) in self.mirror.iter().enumerate() {
            if rule.pattern.is_empty() || rule.prefix.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "mirror[{}] needs a non-empty 'pattern' and 'prefix'",
                    i
                )));
            }
        }

        Ok(())
    }
}

/// Effective configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub config: ToolConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from builtin defaults, an optional TOML file and CLI overrides
    pub fn build(
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults::default().to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Config file
        if let Some(path) = config_path {
            let (value, digest) = Self::load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 3: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let config: ToolConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(format!("invalid configuration: {}", e)))?;
        config.validate()?;

        Ok(Self { config, sources })
    }

    /// Resolve the config file to load: explicit path, else the default file if present
    pub fn locate(explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None).unwrap();

        assert_eq!(config.config.input_root, PathBuf::from("input/filepack"));
        assert_eq!(config.config.mirror, vec![MirrorRule::default()]);
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_build_with_cli_override() {
        let cli = serde_json::json!({
            "output_root": "/tmp/out"
        });

        let config = EffectiveConfig::build(None, Some(cli)).unwrap();

        assert_eq!(config.config.output_root, PathBuf::from("/tmp/out"));
        assert_eq!(config.config.input_root, PathBuf::from("input/filepack"));
        assert_eq!(config.sources.last().unwrap().origin, ConfigOrigin::Cli);
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "input_root = \"vendor/in\"").unwrap();
        writeln!(temp, "[[mirror]]").unwrap();
        writeln!(temp, "pattern = \"github.com/openhwgroup\"").unwrap();
        writeln!(temp, "prefix = \"git@mirror:ohg\"").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None).unwrap();

        assert_eq!(config.config.input_root, PathBuf::from("vendor/in"));
        assert_eq!(config.config.mirror.len(), 1);
        assert_eq!(config.config.mirror[0].prefix, "git@mirror:ohg");

        let file_source = &config.sources[1];
        assert_eq!(file_source.origin, ConfigOrigin::File);
        assert_eq!(file_source.digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_cli_beats_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "input_root = \"from-file\"").unwrap();

        let cli = serde_json::json!({"input_root": "from-cli"});
        let config = EffectiveConfig::build(Some(temp.path()), Some(cli)).unwrap();

        assert_eq!(config.config.input_root, PathBuf::from("from-cli"));
        assert_eq!(config.sources.len(), 3);
    }

    #[test]
    fn test_validation_empty_mirror_prefix() {
        let cli = serde_json::json!({
            "mirror": [{"pattern": "github.com/x", "prefix": ""}]
        });

        let result = EffectiveConfig::build(None, Some(cli));
        assert!(result.unwrap_err().to_string().contains("mirror[0]"));
    }

    #[test]
    fn test_validation_empty_file_name() {
        let cli = serde_json::json!({"lock_file": ""});
        let result = EffectiveConfig::build(None, Some(cli));
        assert!(result.unwrap_err().to_string().contains("lock_file"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = EffectiveConfig::build(Some(Path::new("/nonexistent/tool.toml")), None);
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "input_root = ").unwrap();

        let result = EffectiveConfig::build(Some(temp.path()), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_paths_for_label() {
        let config = ToolConfig::default();
        assert_eq!(
            config.input_dir("20251115"),
            PathBuf::from("input/filepack/20251115")
        );
        assert_eq!(
            config.output_path("20251115"),
            PathBuf::from("output/filepackout/20251115/.bender.yml")
        );
    }
}
