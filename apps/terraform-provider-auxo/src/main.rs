//! AUXO provider process.
//!
//! Speaks line-delimited JSON on stdin/stdout; all logging goes to stderr.

use anyhow::Context;
use auxo_provider::AuxoProvider;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AUXO_LOG";

/// AUXO zero-trust provider
#[derive(Parser, Debug)]
#[command(name = "terraform-provider-auxo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless AUXO_LOG says otherwise
    #[arg(long)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(cli: &Cli) {
    let fallback = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting AUXO provider");

    tfkit::serve_stdio(AuxoProvider::new())
        .await
        .context("provider protocol stream failed")?;

    tracing::info!("input closed, shutting down");
    Ok(())
}
