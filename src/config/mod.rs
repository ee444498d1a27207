//! Resolution of the per-process run configuration.

use serde::Serialize;
use std::path::PathBuf;

pub mod document;
pub mod errors;
pub mod merge;
pub mod resolver;
pub mod tokenizer;
pub mod validation;

pub use errors::{ConfigError, ConfigErrorKind};
pub use resolver::ConfigResolver;
pub use validation::{Check, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// A single process, possibly benchmarking its accelerators.
    Standalone,
    /// Cooperating processes where rank 0 coordinates and the others own device blocks.
    Distributed,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FilePaths {
    pub database: PathBuf,
    /// Fitness of the individuals in the first Pareto front.
    pub plot_data: PathBuf,
    pub plot_source: PathBuf,
    pub plot_image: PathBuf,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub compute_units: u32,
    pub local_work_items: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AcceleratorAssignment {
    /// Devices in the order they were declared.
    pub devices: Vec<Device>,
    pub max_individuals_per_launch: usize,
    pub kernels: PathBuf,
}

/// Parameters of one process's run.
///
/// [`ConfigResolver`] is the validating constructor: a value it returns has passed every
/// check. Fields are public, so a value assembled by hand carries no such guarantee.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub variant: Variant,
    pub process_rank: usize,
    pub process_count: usize,

    pub subpopulation_count: usize,
    pub subpopulation_size: usize,
    /// Parents and children of one subpopulation.
    pub family_size: usize,
    pub world_size: usize,
    /// Parents and children of the whole world.
    pub total_individuals: usize,
    pub pool_size: usize,

    pub generations_per_epoch: usize,
    pub global_migration_count: usize,
    pub local_migration_count: usize,
    pub execution_count: usize,

    pub max_initial_features: usize,
    pub tournament_size: usize,

    pub feature_count: usize,
    /// 0 means the whole database file is used.
    pub instance_count: usize,
    pub objective_count: usize,

    pub centroid_count: usize,
    pub max_clustering_iterations: usize,

    pub files: FilePaths,
    pub accelerator: Option<AcceleratorAssignment>,
    pub benchmark_mode: bool,
}

impl RunConfig {
    pub fn device_count(&self) -> usize {
        self.accelerator
            .as_ref()
            .map_or(0, |accelerator| accelerator.devices.len())
    }

    pub fn device_names(&self) -> impl Iterator<Item = &str> {
        self.devices().map(|device| device.name.as_str())
    }

    pub fn compute_unit_counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.devices().map(|device| device.compute_units)
    }

    pub fn local_work_item_counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.devices().map(|device| device.local_work_items)
    }

    pub fn is_coordinator(&self) -> bool {
        self.variant == Variant::Distributed && self.process_rank == 0
    }

    fn devices(&self) -> impl Iterator<Item = &Device> {
        self.accelerator
            .iter()
            .flat_map(|accelerator| accelerator.devices.iter())
    }
}
