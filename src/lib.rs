// Modules
pub mod cli;
pub mod cluster;
pub mod config;
pub mod consts;
pub mod dataset;
pub mod devices;
pub mod errors;
pub mod logging;

pub use config::{ConfigResolver, RunConfig, Variant};
pub use dataset::Dataset;
pub use errors::StartupError;
