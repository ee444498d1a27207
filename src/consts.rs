/// Number of features (columns) of the database. Fixed at build time because the
/// accelerator kernels are compiled against it.
pub const N_FEATURES: usize = 4;

/// The optimizer is bi-objective for now.
pub const N_OBJECTIVES: usize = 2;

/// K-means internals used by the fitness evaluation.
pub const N_CENTROIDS: usize = 3;
pub const MAX_ITER_KMEANS: usize = 20;

pub const MIN_SUBPOPULATION_SIZE: i64 = 4;
pub const MIN_FEATURES: usize = 4;
pub const MIN_TOURNAMENT_SIZE: i64 = 2;
pub const MIN_PROCESSES: usize = 2;
