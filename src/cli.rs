//! Command-line surface.

use crate::config::errors::ConfigError;
use crate::config::Variant;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  hpmoon -h
  hpmoon -l
  mpirun --host localhost,localhost hpmoon --conf config.json --ns 2 --db db/data.txt
  mpirun --host node0,node1 --map-by node hpmoon --conf config.json --ss 480 --ngm 3 --nlm 2
  hpmoon --mode standalone --conf config.json --nd -1 --cu 8 --wl 1024 --nexec 10";

#[derive(Parser, Debug)]
#[command(
    name = "hpmoon",
    about = "Islands-model multi-objective feature selection, distributed across processes and accelerators.",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// List all available accelerator devices.
    #[arg(short = 'l', long = "list-devices")]
    pub list_devices: bool,

    /// Configuration document (JSON).
    #[arg(long, value_name = "PATH")]
    pub conf: Option<PathBuf>,

    /// Run variant. Defaults to distributed when started by a process launcher.
    #[arg(long, value_enum)]
    pub mode: Option<Variant>,

    /// Print the resolved configuration as JSON.
    #[arg(long)]
    pub print_config: bool,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Per-parameter command-line values. Any value set here takes precedence over the
/// configuration document.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Number of subpopulations.
    #[arg(long = "subpopulations", visible_alias = "ns", allow_negative_numbers = true)]
    pub subpopulations: Option<i64>,

    /// Number of individuals in each subpopulation.
    #[arg(long = "subpopulation-size", visible_alias = "ss", allow_negative_numbers = true)]
    pub subpopulation_size: Option<i64>,

    /// Maximum number of instances taken from the database (0 reads the whole file).
    #[arg(long = "instances", visible_alias = "ni", allow_negative_numbers = true)]
    pub instances: Option<i64>,

    /// File containing the database.
    #[arg(long = "database", visible_alias = "db")]
    pub database: Option<PathBuf>,

    /// Number of generations before each migration.
    #[arg(long = "generations", visible_alias = "g", allow_negative_numbers = true)]
    pub generations: Option<i64>,

    /// Maximum number of features initially selected.
    #[arg(long = "max-features", visible_alias = "maxf", allow_negative_numbers = true)]
    pub max_features: Option<i64>,

    /// Number of individuals competing in each tournament.
    #[arg(long = "tournament-size", visible_alias = "ts", allow_negative_numbers = true)]
    pub tournament_size: Option<i64>,

    /// File receiving the fitness of the first Pareto front.
    #[arg(long = "plot-data", visible_alias = "plotdata")]
    pub plot_data: Option<PathBuf>,

    /// File receiving the plotting script.
    #[arg(long = "plot-source", visible_alias = "plotsrc")]
    pub plot_source: Option<PathBuf>,

    /// File receiving the rendered plot.
    #[arg(long = "plot-image", visible_alias = "plotimg")]
    pub plot_image: Option<PathBuf>,

    /// Number of migrations between subpopulations of different processes.
    #[arg(long = "global-migrations", visible_alias = "ngm", allow_negative_numbers = true)]
    pub global_migrations: Option<i64>,

    /// Number of migrations between subpopulations of the same process.
    #[arg(long = "local-migrations", visible_alias = "nlm", allow_negative_numbers = true)]
    pub local_migrations: Option<i64>,

    /// Number of executions of the program (standalone benchmarks).
    #[arg(long = "executions", visible_alias = "nexec", allow_negative_numbers = true)]
    pub executions: Option<i64>,

    /// Number of accelerator devices, 0 for no offload. In standalone mode a negative
    /// value requests benchmark mode.
    #[arg(long = "devices-count", visible_alias = "nd", allow_negative_numbers = true)]
    pub devices_count: Option<i64>,

    /// Comma separated device names.
    #[arg(long = "device-names", visible_alias = "devn")]
    pub device_names: Option<String>,

    /// Comma separated compute units, one per device.
    #[arg(long = "compute-units", visible_alias = "cu")]
    pub compute_units: Option<String>,

    /// Comma separated local work-items per compute unit, one per device.
    #[arg(long = "work-items", visible_alias = "wl")]
    pub work_items: Option<String>,

    /// Maximum number of individuals processed by a single kernel launch.
    #[arg(long = "max-individuals", visible_alias = "maxind", allow_negative_numbers = true)]
    pub max_individuals: Option<i64>,

    /// File containing the accelerator kernels.
    #[arg(long = "kernels", visible_alias = "ke")]
    pub kernels: Option<PathBuf>,
}

/// What the process was asked to do.
#[derive(Debug)]
pub enum Invocation {
    Help(String),
    ListDevices,
    Run(RunRequest),
}

#[derive(Debug)]
pub struct RunRequest {
    pub conf: PathBuf,
    pub mode: Option<Variant>,
    pub print_config: bool,
    pub overrides: Overrides,
}

/// Parses the command line. Help and device listing short-circuit before the required
/// options are checked.
pub fn parse_invocation<I, T>(args: I) -> Result<Invocation, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            return Ok(Invocation::Help(err.render().to_string()))
        }
        Err(err) => return Err(bad_argument(&err)),
    };

    if cli.list_devices {
        return Ok(Invocation::ListDevices);
    }

    let conf = cli
        .conf
        .ok_or(ConfigError::MissingArgument { flag: "--conf" })?;
    Ok(Invocation::Run(RunRequest {
        conf,
        mode: cli.mode,
        print_config: cli.print_config,
        overrides: cli.overrides,
    }))
}

fn bad_argument(err: &clap::Error) -> ConfigError {
    let flag = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(flag)) => flag.clone(),
        _ => "<unknown>".to_string(),
    };
    let reason = err.kind().as_str().unwrap_or("invalid arguments").to_string();
    ConfigError::BadArgument { flag, reason }
}
