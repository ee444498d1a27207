use crate::config::validation::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classes of configuration failures; each maps to its own exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    CliArgument,
    DocumentLoad,
    DocumentStructure,
    Validation,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required option {flag}")]
    MissingArgument { flag: &'static str },
    #[error("bad value or arity for option {flag}: {reason}")]
    BadArgument { flag: String, reason: String },
    #[error("could not read the configuration document {path:?}: {source}")]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse the configuration document {path:?}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("the configuration document has no `{0}` element")]
    MissingElement(String),
    #[error("element `{element}` has an invalid value `{value}`")]
    InvalidElement { element: String, value: String },
    #[error("the configuration document describes {available} device blocks but process {rank} needs block {rank}")]
    NotEnoughDeviceBlocks { rank: usize, available: usize },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::MissingArgument { .. } | ConfigError::BadArgument { .. } => {
                ConfigErrorKind::CliArgument
            }
            ConfigError::DocumentRead { .. } | ConfigError::DocumentParse { .. } => {
                ConfigErrorKind::DocumentLoad
            }
            ConfigError::MissingElement(_)
            | ConfigError::InvalidElement { .. }
            | ConfigError::NotEnoughDeviceBlocks { .. } => ConfigErrorKind::DocumentStructure,
            ConfigError::Validation(_) => ConfigErrorKind::Validation,
        }
    }
}
