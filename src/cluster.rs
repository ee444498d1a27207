//! Identity of this process among the cooperating processes, and collective abort.

use crate::config::Variant;
use serde::Serialize;
use std::env;
use tracing::{debug, error};

/// Environment variables set by common process launchers, as (rank, size) pairs.
const LAUNCHER_VARIABLES: [(&str, &str); 3] = [
    ("OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI_RANK", "PMI_SIZE"),
    ("PMIX_RANK", "PMIX_SIZE"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessGroup {
    pub rank: usize,
    pub size: usize,
}

impl ProcessGroup {
    pub fn single() -> Self {
        ProcessGroup { rank: 0, size: 1 }
    }

    pub fn is_coordinator(&self) -> bool {
        self.rank == 0
    }
}

pub trait Communicator {
    fn group(&self) -> ProcessGroup;

    /// The variant used when the command line does not choose one.
    fn default_variant(&self) -> Variant;

    /// Terminates every cooperating process with `code`.
    fn abort(&self, code: i32) -> !;
}

/// A process running on its own.
#[derive(Debug, Default)]
pub struct LocalCommunicator;

impl Communicator for LocalCommunicator {
    fn group(&self) -> ProcessGroup {
        ProcessGroup::single()
    }

    fn default_variant(&self) -> Variant {
        Variant::Standalone
    }

    fn abort(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// A process started by a parallel launcher, which reports rank and size through the
/// environment and tears down the whole job as soon as one process exits with failure.
#[derive(Debug)]
pub struct LauncherCommunicator {
    group: ProcessGroup,
}

impl LauncherCommunicator {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        LAUNCHER_VARIABLES.iter().find_map(|&(rank, size)| {
            let rank: usize = lookup(rank)?.trim().parse().ok()?;
            let size: usize = lookup(size)?.trim().parse().ok()?;
            (rank < size).then_some(LauncherCommunicator {
                group: ProcessGroup { rank, size },
            })
        })
    }
}

impl Communicator for LauncherCommunicator {
    fn group(&self) -> ProcessGroup {
        self.group
    }

    fn default_variant(&self) -> Variant {
        Variant::Distributed
    }

    fn abort(&self, code: i32) -> ! {
        error!(
            rank = self.group.rank,
            processes = self.group.size,
            code,
            "aborting all cooperating processes"
        );
        std::process::exit(code)
    }
}

/// Picks the launcher communicator when the environment describes one.
pub fn detect() -> Box<dyn Communicator> {
    match LauncherCommunicator::from_env() {
        Some(communicator) => {
            debug!(group = ?communicator.group, "started by a process launcher");
            Box::new(communicator)
        }
        None => Box::new(LocalCommunicator),
    }
}
