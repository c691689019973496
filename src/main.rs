use std::process::ExitCode;

use aurl::cli::Cli;
use aurl::error::AurlResult;
use aurl::execution::AurlExecution;
use aurl::profile::{create_file_profile_store, ProfileStore};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "off" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}

async fn run(cli: Cli) -> AurlResult<()> {
    let config = cli.into_config()?;
    tracing::debug!(
        profile = %config.profile_name,
        method = %config.method,
        url = %config.target_url,
        "aurl starting"
    );

    let profiles = create_file_profile_store(config.profiles_path.clone())?;
    let profile = profiles.load_profile(&config.profile_name)?;

    let execution = AurlExecution::new(config, profile)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execution.execute(&mut out).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(code = e.error_code(), "aurl failed");
            eprintln!("aurl: error: {}", e);
            ExitCode::FAILURE
        }
    }
}
