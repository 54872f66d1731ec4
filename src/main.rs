use anyhow::Result;
use churn_ui_lib::commands::Cli;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(format!("churn_ui_lib={}", level).parse()?))
        .init();

    info!(command = ?cli.command, "churn-ui starting");
    churn_ui_lib::run(cli).await
}
