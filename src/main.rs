use anyhow::Context;
use clap::Parser;
use pushcast::cli::{self, Cli};
use pushcast::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger(cli::logger_config(&cli)).context("Failed to initialize logger")?;

    let loader = cli::config_loader(&cli);
    tracing::debug!(
        version = pushcast::pkg_version(),
        config_file = %loader.config_file().display(),
        "Loading notification settings"
    );
    let settings = loader.load();

    cli::execute_command(&cli, &settings).await?;

    Ok(())
}
