//! The table of named invariant checks run while a `RunConfig` is being resolved.
//!
//! Each check is evaluated right after the value it guards has been resolved, so the
//! first violated invariant aborts resolution.

use crate::consts::{
    MIN_FEATURES, MIN_PROCESSES, MIN_SUBPOPULATION_SIZE, MIN_TOURNAMENT_SIZE, N_OBJECTIVES,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    SubpopulationCount,
    SubpopulationSize,
    PopulationOverflow,
    MigrationsMinimum,
    MigrationsImplyMultiSubpop,
    GenerationsMinimum,
    GenerationsZeroImpliesNoMigration,
    MaxFeaturesMinimum,
    TournamentSizeBounds,
    FeatureCountMinimum,
    DeviceCountMinimum,
    ComputeUnitsSufficiency,
    WorkItemsSufficiency,
    ProcessCountMinimum,
    ExecutionsMinimum,
    InstanceCountMinimum,
    MaxIndividualsMinimum,
    ObjectiveCount,
}

impl Check {
    pub const ALL: [Check; 18] = [
        Check::SubpopulationCount,
        Check::SubpopulationSize,
        Check::PopulationOverflow,
        Check::MigrationsMinimum,
        Check::MigrationsImplyMultiSubpop,
        Check::GenerationsMinimum,
        Check::GenerationsZeroImpliesNoMigration,
        Check::MaxFeaturesMinimum,
        Check::TournamentSizeBounds,
        Check::FeatureCountMinimum,
        Check::DeviceCountMinimum,
        Check::ComputeUnitsSufficiency,
        Check::WorkItemsSufficiency,
        Check::ProcessCountMinimum,
        Check::ExecutionsMinimum,
        Check::InstanceCountMinimum,
        Check::MaxIndividualsMinimum,
        Check::ObjectiveCount,
    ];

    /// Stable identifier, used in diagnostics and in tests.
    pub fn name(self) -> &'static str {
        match self {
            Check::SubpopulationCount => "subpopulation-count",
            Check::SubpopulationSize => "subpopulation-size",
            Check::PopulationOverflow => "population-overflow",
            Check::MigrationsMinimum => "migrations-minimum",
            Check::MigrationsImplyMultiSubpop => "migrations-imply-multi-subpop",
            Check::GenerationsMinimum => "generations-minimum",
            Check::GenerationsZeroImpliesNoMigration => "generations-zero-implies-no-migration",
            Check::MaxFeaturesMinimum => "max-features-minimum",
            Check::TournamentSizeBounds => "tournament-size-bounds",
            Check::FeatureCountMinimum => "feature-count-minimum",
            Check::DeviceCountMinimum => "device-count-minimum",
            Check::ComputeUnitsSufficiency => "compute-units-sufficiency",
            Check::WorkItemsSufficiency => "work-items-sufficiency",
            Check::ProcessCountMinimum => "process-count-minimum",
            Check::ExecutionsMinimum => "executions-minimum",
            Check::InstanceCountMinimum => "instance-count-minimum",
            Check::MaxIndividualsMinimum => "max-individuals-minimum",
            Check::ObjectiveCount => "objective-count",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Check::SubpopulationCount => "the number of subpopulations must be 1 or higher",
            Check::SubpopulationSize => {
                "the number of individuals in each subpopulation must be 4 or higher"
            }
            Check::PopulationOverflow => {
                "the number of subpopulations times their size is too large to represent"
            }
            Check::MigrationsMinimum => "the number of migrations must be 1 or higher",
            Check::MigrationsImplyMultiSubpop => {
                "more than one global migration requires more than one subpopulation"
            }
            Check::GenerationsMinimum => "the number of generations must be 0 or higher",
            Check::GenerationsZeroImpliesNoMigration => {
                "zero generations cannot be combined with more than one migration"
            }
            Check::MaxFeaturesMinimum => {
                "the maximum initial number of features must be 1 or higher"
            }
            Check::TournamentSizeBounds => {
                "the tournament size must be between 2 and the subpopulation size"
            }
            Check::FeatureCountMinimum => "the number of features must be 4 or higher",
            Check::DeviceCountMinimum => "the number of devices must be 0 or higher",
            Check::ComputeUnitsSufficiency => "specified fewer compute units than devices",
            Check::WorkItemsSufficiency => "specified fewer local work-items than devices",
            Check::ProcessCountMinimum => "the number of processes must be 2 or higher",
            Check::ExecutionsMinimum => "the number of executions must be 1 or higher",
            Check::InstanceCountMinimum => "the number of instances must be 0 or higher",
            Check::MaxIndividualsMinimum => {
                "the maximum of individuals per kernel launch must be 1 or higher"
            }
            Check::ObjectiveCount => "the number of objectives must be 2",
        }
    }

    /// Fails with this check when `violated` holds.
    pub fn ensure(self, violated: bool) -> Result<(), ValidationError> {
        if violated {
            Err(ValidationError { check: self })
        } else {
            Ok(())
        }
    }

    fn at_least(self, value: i64, minimum: i64) -> Result<usize, ValidationError> {
        self.ensure(value < minimum)?;
        usize::try_from(value).map_err(|_| ValidationError { check: self })
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{} (check `{}`)", .check.message(), .check.name())]
pub struct ValidationError {
    pub check: Check,
}

pub fn subpopulation_count(value: i64) -> Result<usize, ValidationError> {
    Check::SubpopulationCount.at_least(value, 1)
}

pub fn subpopulation_size(value: i64) -> Result<usize, ValidationError> {
    Check::SubpopulationSize.at_least(value, MIN_SUBPOPULATION_SIZE)
}

pub fn instance_count(value: i64) -> Result<usize, ValidationError> {
    Check::InstanceCountMinimum.at_least(value, 0)
}

pub fn global_migrations(value: i64, subpopulations: usize) -> Result<usize, ValidationError> {
    let migrations = Check::MigrationsMinimum.at_least(value, 1)?;
    Check::MigrationsImplyMultiSubpop.ensure(migrations > 1 && subpopulations == 1)?;
    Ok(migrations)
}

/// `factor * size` for population arithmetic, failing instead of wrapping.
pub fn population_product(factor: usize, size: usize) -> Result<usize, ValidationError> {
    factor.checked_mul(size).ok_or(ValidationError {
        check: Check::PopulationOverflow,
    })
}

pub fn local_migrations(value: i64) -> Result<usize, ValidationError> {
    Check::MigrationsMinimum.at_least(value, 1)
}

pub fn generations(
    value: i64,
    global_migrations: usize,
    local_migrations: usize,
) -> Result<usize, ValidationError> {
    let generations = Check::GenerationsMinimum.at_least(value, 0)?;
    Check::GenerationsZeroImpliesNoMigration
        .ensure(generations == 0 && (global_migrations > 1 || local_migrations > 1))?;
    Ok(generations)
}

pub fn max_features(value: i64) -> Result<usize, ValidationError> {
    Check::MaxFeaturesMinimum.at_least(value, 1)
}

pub fn tournament_size(value: i64, subpopulation_size: usize) -> Result<usize, ValidationError> {
    let size = Check::TournamentSizeBounds.at_least(value, MIN_TOURNAMENT_SIZE)?;
    Check::TournamentSizeBounds.ensure(size > subpopulation_size)?;
    Ok(size)
}

pub fn feature_count(value: usize) -> Result<usize, ValidationError> {
    Check::FeatureCountMinimum.ensure(value < MIN_FEATURES)?;
    Ok(value)
}

pub fn objective_count(value: usize) -> Result<usize, ValidationError> {
    Check::ObjectiveCount.ensure(value != N_OBJECTIVES)?;
    Ok(value)
}

pub fn device_count(value: i64) -> Result<usize, ValidationError> {
    Check::DeviceCountMinimum.at_least(value, 0)
}

pub fn executions(value: i64) -> Result<usize, ValidationError> {
    Check::ExecutionsMinimum.at_least(value, 1)
}

pub fn max_individuals(value: i64) -> Result<usize, ValidationError> {
    Check::MaxIndividualsMinimum.at_least(value, 1)
}

pub fn process_count(value: usize) -> Result<usize, ValidationError> {
    Check::ProcessCountMinimum.ensure(value < MIN_PROCESSES)?;
    Ok(value)
}

/// Used for the compute-unit and work-item lists, which must cover every device.
pub fn sufficient_tokens(
    check: Check,
    found: usize,
    devices: usize,
) -> Result<(), ValidationError> {
    check.ensure(found < devices)
}
