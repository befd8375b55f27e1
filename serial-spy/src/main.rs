use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use serial_spy::app::{self, PortListing, ValidationReport};
use serial_spy::cli::SpyCli;
use serial_spy::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = SpyCli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(app::exit_code(&e))
        }
    }
}

async fn run(cli: SpyCli) -> Result<()> {
    if cli.list_ports {
        let listing = PortListing::build()?;
        listing.render_text(&mut std::io::stdout().lock())?;
        return Ok(());
    }

    let config = app::load_config(&cli).await?;
    logging::init_tracing(&config.general)?;

    if cli.validate {
        let report = ValidationReport::build(&config)?;
        report.render_text(&mut std::io::stdout().lock())?;
        return Ok(());
    }

    tracing::info!(channels = config.channels.len(), "serial-spy starting");
    app::run_logger(config).await
}
