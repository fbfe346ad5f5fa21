//! Error type for a reconciliation run.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Everything that can abort a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} does not exist: {}", path.display())]
    MissingInput { kind: &'static str, path: PathBuf },

    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
