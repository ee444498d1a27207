use crate::cli::Overrides;
use crate::cluster::ProcessGroup;
use crate::config::document::{BlockRef, ConfigDocument, DeviceBlock};
use crate::config::errors::ConfigError;
use crate::config::merge::{merge, merge_optional};
use crate::config::tokenizer;
use crate::config::validation::{self, Check, ValidationError};
use crate::config::{AcceleratorAssignment, Device, FilePaths, RunConfig, Variant};
use crate::consts::{MAX_ITER_KMEANS, N_CENTROIDS, N_FEATURES, N_OBJECTIVES};
use itertools::izip;
use std::path::Path;
use tracing::{debug, info, warn};

type BlockLookup<'a> = dyn Fn() -> Result<BlockRef<'a>, ConfigError> + 'a;

/// Builds the `RunConfig` of one process from the command-line overrides and the shared
/// configuration document. Either returns a fully validated configuration or the first
/// violated invariant; it never terminates the process itself.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    variant: Variant,
    group: ProcessGroup,
    feature_count: usize,
    objective_count: usize,
}

/// Population sizes that follow from the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedSizes {
    pub family_size: usize,
    pub world_size: usize,
    pub total_individuals: usize,
    pub pool_size: usize,
}

impl DerivedSizes {
    /// Fails with `Check::PopulationOverflow` when a product does not fit in a `usize`.
    pub fn new(
        subpopulation_count: usize,
        subpopulation_size: usize,
    ) -> Result<Self, ValidationError> {
        let world_size = validation::population_product(subpopulation_count, subpopulation_size)?;
        Ok(DerivedSizes {
            family_size: validation::population_product(subpopulation_size, 2)?,
            world_size,
            total_individuals: validation::population_product(world_size, 2)?,
            pool_size: subpopulation_size / 2,
        })
    }
}

impl ConfigResolver {
    pub fn new(variant: Variant, group: ProcessGroup) -> Self {
        ConfigResolver {
            variant,
            group,
            feature_count: N_FEATURES,
            objective_count: N_OBJECTIVES,
        }
    }

    /// Overrides the build-time feature count, for databases compiled with another width.
    pub fn with_feature_count(mut self, feature_count: usize) -> Self {
        self.feature_count = feature_count;
        self
    }

    pub fn with_objective_count(mut self, objective_count: usize) -> Self {
        self.objective_count = objective_count;
        self
    }

    /// Loads the document at `conf` and resolves it against `overrides`.
    pub fn resolve(&self, conf: &Path, overrides: &Overrides) -> Result<RunConfig, ConfigError> {
        let document = ConfigDocument::load(conf)?;
        self.resolve_document(&document, overrides)
    }

    pub fn resolve_document(
        &self,
        document: &ConfigDocument,
        overrides: &Overrides,
    ) -> Result<RunConfig, ConfigError> {
        let feature_count = validation::feature_count(self.feature_count)?;
        let objective_count = validation::objective_count(self.objective_count)?;

        let subpopulation_count = validation::subpopulation_count(merge(
            overrides.subpopulations,
            "subpopulations",
            || document.subpopulations,
        )?)?;
        let subpopulation_size = validation::subpopulation_size(merge(
            overrides.subpopulation_size,
            "subpopulation_size",
            || document.subpopulation_size,
        )?)?;
        let derived = DerivedSizes::new(subpopulation_count, subpopulation_size)?;
        let instance_count = validation::instance_count(merge(
            overrides.instances,
            "instances",
            || document.instances,
        )?)?;
        let database = merge(overrides.database.clone(), "database", || {
            document.database.clone()
        })?;

        let global_migration_count = validation::global_migrations(
            merge(overrides.global_migrations, "global_migrations", || {
                document.global_migrations
            })?,
            subpopulation_count,
        )?;
        let local_migration_count = validation::local_migrations(merge(
            overrides.local_migrations,
            "local_migrations",
            || document.local_migrations,
        )?)?;
        let generations_per_epoch = validation::generations(
            merge(overrides.generations, "generations", || document.generations)?,
            global_migration_count,
            local_migration_count,
        )?;

        let max_initial_features = validation::max_features(merge(
            overrides.max_features,
            "max_features",
            || document.max_features,
        )?)?;

        let files = FilePaths {
            database,
            plot_data: merge(overrides.plot_data.clone(), "plot_data", || {
                document.plot_data.clone()
            })?,
            plot_source: merge(overrides.plot_source.clone(), "plot_source", || {
                document.plot_source.clone()
            })?,
            plot_image: merge(overrides.plot_image.clone(), "plot_image", || {
                document.plot_image.clone()
            })?,
        };

        let tournament_size = validation::tournament_size(
            merge(overrides.tournament_size, "tournament_size", || {
                document.tournament_size
            })?,
            subpopulation_size,
        )?;

        let (execution_count, accelerator, benchmark_mode) = match self.variant {
            Variant::Standalone => {
                let executions = validation::executions(merge(
                    overrides.executions,
                    "executions",
                    || document.executions,
                )?)?;
                let (accelerator, benchmark_mode) = self.standalone_devices(document, overrides)?;
                (executions, accelerator, benchmark_mode)
            }
            Variant::Distributed => (1, self.distributed_devices(document, overrides)?, false),
        };

        let process_count = match self.variant {
            Variant::Distributed => validation::process_count(self.group.size)?,
            Variant::Standalone => self.group.size,
        };

        let config = RunConfig {
            variant: self.variant,
            process_rank: self.group.rank,
            process_count,
            subpopulation_count,
            subpopulation_size,
            family_size: derived.family_size,
            world_size: derived.world_size,
            total_individuals: derived.total_individuals,
            pool_size: derived.pool_size,
            generations_per_epoch,
            global_migration_count,
            local_migration_count,
            execution_count,
            max_initial_features,
            tournament_size,
            feature_count,
            instance_count,
            objective_count,
            centroid_count: N_CENTROIDS,
            max_clustering_iterations: MAX_ITER_KMEANS,
            files,
            accelerator,
            benchmark_mode,
        };

        info!(
            rank = config.process_rank,
            processes = config.process_count,
            variant = ?config.variant,
            subpopulations = config.subpopulation_count,
            subpopulation_size = config.subpopulation_size,
            devices = config.device_count(),
            benchmark_mode = config.benchmark_mode,
            "run configuration resolved"
        );
        Ok(config)
    }

    /// A single signed device count: negative requests benchmark mode, zero or absent
    /// disables offloading.
    fn standalone_devices(
        &self,
        document: &ConfigDocument,
        overrides: &Overrides,
    ) -> Result<(Option<AcceleratorAssignment>, bool), ConfigError> {
        let requested = merge_optional(overrides.devices_count, || {
            document
                .accelerator
                .as_ref()
                .and_then(|section| section.local.devices_count)
        })
        .unwrap_or(0);
        let count = usize::try_from(requested.unsigned_abs()).map_err(|_| {
            ConfigError::InvalidElement {
                element: "devices_count".into(),
                value: requested.to_string(),
            }
        })?;

        let block = move || document.local_block();
        let accelerator = assign_devices(count, overrides, &block)?;
        let benchmark_mode = requested < 0 && accelerator.is_some();
        Ok((accelerator, benchmark_mode))
    }

    /// The coordinator never owns devices; every other rank reads its own block.
    fn distributed_devices(
        &self,
        document: &ConfigDocument,
        overrides: &Overrides,
    ) -> Result<Option<AcceleratorAssignment>, ConfigError> {
        let rank = self.group.rank;
        if rank == 0 {
            debug!("coordinator process, no devices assigned");
            return Ok(None);
        }

        let block = move || {
            document
                .block_for_rank(rank)?
                .ok_or_else(|| ConfigError::MissingElement("accelerator.nodes".into()))
        };
        let (requested, _) = device_field(overrides.devices_count, &block, "devices_count", |b| {
            b.devices_count
        })?;
        let count = validation::device_count(requested)?;
        assign_devices(count, overrides, &block)
    }
}

fn assign_devices<'a>(
    requested: usize,
    overrides: &Overrides,
    block: &BlockLookup<'a>,
) -> Result<Option<AcceleratorAssignment>, ConfigError> {
    if requested == 0 {
        return Ok(None);
    }

    let (names, _) = device_field(overrides.device_names.clone(), block, "device_names", |b| {
        b.device_names.clone()
    })?;
    let names = tokenizer::split(&names, requested);
    if names.len() < requested {
        warn!(
            requested,
            named = names.len(),
            "fewer device names than devices, only the named devices are used"
        );
    }
    let count = names.len();
    if count == 0 {
        return Ok(None);
    }

    let compute_units = parse_counts(
        overrides.compute_units.clone(),
        block,
        "compute_units",
        |b| b.compute_units.clone(),
        count,
        Check::ComputeUnitsSufficiency,
    )?;
    let work_items = parse_counts(
        overrides.work_items.clone(),
        block,
        "work_items",
        |b| b.work_items.clone(),
        count,
        Check::WorkItemsSufficiency,
    )?;

    let (max_individuals, _) =
        device_field(overrides.max_individuals, block, "max_individuals", |b| {
            b.max_individuals
        })?;
    let max_individuals_per_launch = validation::max_individuals(max_individuals)?;
    let (kernels, _) =
        device_field(overrides.kernels.clone(), block, "kernels", |b| b.kernels.clone())?;

    let devices = izip!(names, compute_units, work_items)
        .map(|(name, compute_units, local_work_items)| Device {
            name,
            compute_units,
            local_work_items,
        })
        .collect();

    Ok(Some(AcceleratorAssignment {
        devices,
        max_individuals_per_launch,
        kernels,
    }))
}

/// Resolves a device-block field, returning the value and a label of where it came from.
fn device_field<'a, T>(
    override_value: Option<T>,
    block: &BlockLookup<'a>,
    field: &str,
    get: impl FnOnce(&'a DeviceBlock) -> Option<T>,
) -> Result<(T, String), ConfigError> {
    if override_value.is_some() {
        let value = merge(override_value, field, || None)?;
        return Ok((value, format!("{field} (command line)")));
    }
    let block = block()?;
    let element = block.element(field);
    let value = merge(None, &element, || get(block.block))?;
    Ok((value, element))
}

/// Tokenizes a per-device list, truncated to `devices` entries. A shorter list fails
/// `check`.
fn parse_counts<'a>(
    override_value: Option<String>,
    block: &BlockLookup<'a>,
    field: &str,
    get: impl FnOnce(&'a DeviceBlock) -> Option<String>,
    devices: usize,
    check: Check,
) -> Result<Vec<u32>, ConfigError> {
    let (text, element) = device_field(override_value, block, field, get)?;
    let tokens = tokenizer::split(&text, devices);
    validation::sufficient_tokens(check, tokens.len(), devices)?;
    tokens
        .into_iter()
        .map(|token| {
            token.parse::<u32>().map_err(|_| ConfigError::InvalidElement {
                element: element.clone(),
                value: token,
            })
        })
        .collect()
}
