use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("could not open the database file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not read the database file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("value #{position} of {path:?} is not a finite number: `{token}`")]
    Parse {
        path: PathBuf,
        position: usize,
        token: String,
    },
    #[error("the database file {path:?} holds {found} values, expected {expected}")]
    ShortRead {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("the database file {path:?} holds {values} values, which is not a multiple of {features} features")]
    RaggedExtent {
        path: PathBuf,
        values: usize,
        features: usize,
    },
    #[error("normalization needs at least 2 instances, got {rows}")]
    TooFewInstances { rows: usize },
    #[error("the database must have at least one feature")]
    NoFeatures,
}
