//! bender-overrides - keep `.bender.yml` overrides in step with `Bender.lock`
//!
//! Every dependency the lock file resolves but `Bender.yml` does not declare
//! is pinned in the `overrides:` section of `.bender.yml`, with upstream URLs
//! rewritten to the internal mirror. The rest of the file is left as written.

pub mod config;
pub mod error;
pub mod manifest;
pub mod reconcile;
pub mod render;
pub mod report;
pub mod splice;

pub use config::{ConfigError, EffectiveConfig, ToolConfig};
pub use error::Error;
pub use reconcile::{process_label, update_override_text, RunOutcome};
pub use report::RunReport;
