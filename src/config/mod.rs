//! Tool configuration
//!
//! Three layers, later ones win:
//! 1. Built-in defaults
//! 2. TOML config file (`--config`, or `bender-overrides.toml` if present)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::BuiltinDefaults;
pub use effective::{
    ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig, ToolConfig, DEFAULT_CONFIG_FILE,
};
pub use merge::{deep_merge, merge_layers};
