use hpmoon::cli::{parse_invocation, Invocation, RunRequest};
use hpmoon::cluster::{self, Communicator};
use hpmoon::config::{ConfigResolver, Variant};
use hpmoon::dataset::Dataset;
use hpmoon::devices::{render_listing, HostCatalog};
use hpmoon::errors::{exit_code_of, StartupError};
use hpmoon::logging;
use tracing::info;

fn main() {
    dotenv::dotenv().ok();
    logging::init();

    let communicator = cluster::detect();
    if let Err(err) = run(communicator.as_ref()) {
        let code = exit_code_of(&err);
        eprintln!("process {}: {err:#}", communicator.group().rank);
        communicator.abort(code);
    }
}

fn run(communicator: &dyn Communicator) -> anyhow::Result<()> {
    let group = communicator.group();
    let distributed = communicator.default_variant() == Variant::Distributed;

    let request = match parse_invocation(std::env::args_os()).map_err(StartupError::from)? {
        Invocation::Help(text) => {
            if !distributed || group.is_coordinator() {
                print!("{text}");
            }
            return Ok(());
        }
        Invocation::ListDevices => {
            let rank = distributed.then_some(group.rank);
            print!("{}", render_listing(&HostCatalog, rank));
            return Ok(());
        }
        Invocation::Run(request) => request,
    };

    start(communicator, request)
}

fn start(communicator: &dyn Communicator, request: RunRequest) -> anyhow::Result<()> {
    let variant = request
        .mode
        .unwrap_or_else(|| communicator.default_variant());
    let config = ConfigResolver::new(variant, communicator.group())
        .resolve(&request.conf, &request.overrides)
        .map_err(StartupError::from)?;

    if request.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    let dataset = Dataset::prepare(&config).map_err(StartupError::from)?;
    let by_feature = dataset.transposed();
    info!(
        rank = config.process_rank,
        instances = dataset.rows(),
        features = dataset.cols(),
        feature_major = ?by_feature.dim(),
        "ready to start the optimizer"
    );
    Ok(())
}
