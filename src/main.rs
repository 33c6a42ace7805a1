//! ClickCut CLI entry point

use clap::Parser;
use clickcut::cli::{self, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("CLICKCUT_LOG"))
        .init();

    let cli = Cli::parse();
    cli::run(cli).await
}
