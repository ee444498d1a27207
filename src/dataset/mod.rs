//! The numeric dataset the optimizer works on: loaded from the database file, normalized
//! column by column, and reshaped on demand.

pub mod errors;
pub mod loader;
pub mod normalize;
pub mod transpose;

pub use errors::DatasetError;

use crate::config::RunConfig;
use ndarray::Array2;
use tracing::info;

/// Instance-major matrix, `rows` instances of `cols` features.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: Array2<f32>,
}

impl Dataset {
    /// Loads the database named by `config` and normalizes it.
    pub fn prepare(config: &RunConfig) -> Result<Self, DatasetError> {
        let path = &config.files.database;
        let raw = loader::load(path, config.instance_count, config.feature_count)?;
        let dataset = Self::from_raw(raw)?;
        info!(
            database = %path.display(),
            instances = dataset.rows(),
            features = dataset.cols(),
            "dataset prepared"
        );
        Ok(dataset)
    }

    /// Normalizes an already loaded instance-major matrix.
    pub fn from_raw(raw: Array2<f32>) -> Result<Self, DatasetError> {
        Ok(Dataset {
            values: normalize::normalize(&raw)?,
        })
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    /// Feature-major copy, one contiguous row per feature.
    pub fn transposed(&self) -> Array2<f32> {
        transpose::to_feature_major(&self.values)
    }
}
