use streamframer::cli::{handle_version_command, parse_args, run_stream, CliCommand, USAGE};
use streamframer::FramerConfig;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Exit code for unusable command-line arguments.
const EXIT_USAGE: i32 = 2;

/// Logs go to stderr so stdout carries nothing but event lines.
fn init_tracing() {
    let default_level = "warn";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let options = match parse_args(std::env::args()) {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid(reason) => {
            eprintln!("Error: {}\n\n{}", reason, USAGE);
            std::process::exit(EXIT_USAGE);
        }
        CliCommand::Stream(options) => options,
    };

    color_eyre::install()?;
    init_tracing();

    let config = FramerConfig::from_env();
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let mut stdout = std::io::stdout().lock();
    let summary = run_stream(&options, &config, &mut stdout, shutdown).await?;
    tracing::info!(
        "Stream {} finished after {} event(s)",
        summary.trace_id,
        summary.events
    );

    match summary.fatal {
        Some(error) => Err(eyre!("{}: {}", error.message, error.error)),
        None => Ok(()),
    }
}
