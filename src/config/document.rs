use crate::config::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The shared declarative configuration document.
///
/// Every element is optional at the type level: whether a missing element is an error
/// depends on whether the command line already supplied the parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ConfigDocument {
    pub subpopulations: Option<i64>,
    pub subpopulation_size: Option<i64>,
    pub instances: Option<i64>,
    pub database: Option<PathBuf>,
    pub global_migrations: Option<i64>,
    pub local_migrations: Option<i64>,
    pub generations: Option<i64>,
    pub max_features: Option<i64>,
    pub tournament_size: Option<i64>,
    pub plot_data: Option<PathBuf>,
    pub plot_source: Option<PathBuf>,
    pub plot_image: Option<PathBuf>,
    pub executions: Option<i64>,
    pub accelerator: Option<AcceleratorSection>,
}

/// Accelerator settings of one process.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DeviceBlock {
    pub devices_count: Option<i64>,
    pub device_names: Option<String>,
    pub compute_units: Option<String>,
    pub work_items: Option<String>,
    pub max_individuals: Option<i64>,
    pub kernels: Option<PathBuf>,
}

/// The `accelerator` element. A standalone run reads the flattened block; a distributed
/// run reads one entry of `nodes` per non-coordinator process, in authored order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AcceleratorSection {
    #[serde(flatten)]
    pub local: DeviceBlock,
    #[serde(default)]
    pub nodes: Vec<DeviceBlock>,
}

/// A device block together with the document path it was found at, so that missing or
/// invalid elements can be reported precisely.
#[derive(Debug, Clone, Copy)]
pub struct BlockRef<'a> {
    pub block: &'a DeviceBlock,
    prefix: BlockPrefix,
}

#[derive(Debug, Clone, Copy)]
enum BlockPrefix {
    Local,
    Node(usize),
}

impl<'a> BlockRef<'a> {
    pub fn element(&self, field: &str) -> String {
        match self.prefix {
            BlockPrefix::Local => format!("accelerator.{field}"),
            BlockPrefix::Node(index) => format!("accelerator.nodes[{index}].{field}"),
        }
    }
}

impl ConfigDocument {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
        let document =
            serde_json::from_str(&text).map_err(|source| ConfigError::DocumentParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), "configuration document loaded");
        Ok(document)
    }

    fn accelerator(&self) -> Result<&AcceleratorSection, ConfigError> {
        self.accelerator
            .as_ref()
            .ok_or_else(|| ConfigError::MissingElement("accelerator".into()))
    }

    /// The flattened block used by a standalone run.
    pub fn local_block(&self) -> Result<BlockRef<'_>, ConfigError> {
        Ok(BlockRef {
            block: &self.accelerator()?.local,
            prefix: BlockPrefix::Local,
        })
    }

    /// The block of a non-coordinator process: rank 1 owns the first block, rank 2 the
    /// second and so on. The coordinator has no block.
    pub fn block_for_rank(&self, rank: usize) -> Result<Option<BlockRef<'_>>, ConfigError> {
        if rank == 0 {
            return Ok(None);
        }
        let section = self.accelerator()?;
        let index = rank - 1;
        let block = section
            .nodes
            .get(index)
            .ok_or(ConfigError::NotEnoughDeviceBlocks {
                rank,
                available: section.nodes.len(),
            })?;
        Ok(Some(BlockRef {
            block,
            prefix: BlockPrefix::Node(index),
        }))
    }
}
