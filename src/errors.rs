//! Failures that stop a process before the optimizer starts, and the exit codes they map to.
//!
//! | code | meaning |
//! |---|---|
//! | 0 | success, help or device listing |
//! | 1 | any other failure |
//! | 2 | bad command line argument |
//! | 3 | configuration document could not be read or parsed |
//! | 4 | configuration document lacks or mistypes an element |
//! | 5 | a resolved parameter failed validation |
//! | 6 | the dataset could not be loaded or normalized |

use crate::config::{ConfigError, ConfigErrorKind};
use crate::dataset::DatasetError;
use thiserror::Error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CLI_ARGUMENT: i32 = 2;
pub const EXIT_DOCUMENT_LOAD: i32 = 3;
pub const EXIT_DOCUMENT_STRUCTURE: i32 = 4;
pub const EXIT_VALIDATION: i32 = 5;
pub const EXIT_DATASET: i32 = 6;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::Config(err) => match err.kind() {
                ConfigErrorKind::CliArgument => EXIT_CLI_ARGUMENT,
                ConfigErrorKind::DocumentLoad => EXIT_DOCUMENT_LOAD,
                ConfigErrorKind::DocumentStructure => EXIT_DOCUMENT_STRUCTURE,
                ConfigErrorKind::Validation => EXIT_VALIDATION,
            },
            StartupError::Dataset(_) => EXIT_DATASET,
        }
    }
}

/// Exit code for an error that reached the binary boundary.
pub fn exit_code_of(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<StartupError>()
        .map(StartupError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Check, ValidationError};

    #[test]
    fn test_exit_codes() {
        let cli: StartupError = ConfigError::MissingArgument { flag: "--conf" }.into();
        assert_eq!(cli.exit_code(), EXIT_CLI_ARGUMENT);

        let structure: StartupError = ConfigError::MissingElement("generations".into()).into();
        assert_eq!(structure.exit_code(), EXIT_DOCUMENT_STRUCTURE);

        let validation: StartupError = ConfigError::from(ValidationError {
            check: Check::TournamentSizeBounds,
        })
        .into();
        assert_eq!(validation.exit_code(), EXIT_VALIDATION);

        let dataset: StartupError = DatasetError::TooFewInstances { rows: 1 }.into();
        assert_eq!(dataset.exit_code(), EXIT_DATASET);
    }

    #[test]
    fn test_boundary_downcast() {
        let err = anyhow::Error::new(StartupError::from(DatasetError::NoFeatures));
        assert_eq!(exit_code_of(&err), EXIT_DATASET);
        assert_eq!(exit_code_of(&anyhow::anyhow!("boom")), EXIT_FAILURE);
    }
}
