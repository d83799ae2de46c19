//! jobboard CLI entry point
//!
//! Loads `.env` and the configuration file, sets up tracing on stderr and
//! dispatches to the command handlers in [`jobboard::cli::commands`].

use jobboard::cli::{commands, output::Output, Cli};
use jobboard::utils::config::LoggingConfig;
use jobboard::JobBoardConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    if let Err(e) = run(cli, &output).await {
        output.error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    let config = JobBoardConfig::load(cli.config.as_deref())?;
    init_tracing(&config.logging, cli.verbose);
    commands::run(cli, config, output).await
}

/// `RUST_LOG` wins over the configured level; `--verbose` raises the default to debug.
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
