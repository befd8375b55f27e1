//! Top-level command flows: logging run, `--validate` and `--list-ports`.

use std::io::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use serial_spy_core::config::SpyConfig;
use serial_spy_core::error::SpyError;
use serial_spy_pipeline::{ChannelConfig, SinkOptions, compile_channels};

use crate::cli::SpyCli;
use crate::coordinator::{Coordinator, wait_for_shutdown_signal};
use crate::serial::{PortSummary, SerialTransport, list_ports};

/// Exit code for configuration and channel validation failures.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Map an error to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SpyError>() {
        Some(spy) if spy.is_fatal() => EXIT_CONFIG,
        _ => EXIT_FAILURE,
    }
}

/// Load the configuration file named on the command line and apply
/// environment and command-line overrides, in that order.
pub async fn load_config(cli: &SpyCli) -> Result<SpyConfig> {
    let path = cli
        .config
        .as_ref()
        .context("a configuration file is required")?;

    let mut config = SpyConfig::load(path).await?;
    cli.apply_overrides(&mut config.general);
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        channels = config.channels.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Sink settings from the general section.
pub fn sink_options(config: &SpyConfig) -> SinkOptions {
    SinkOptions {
        text_log: config.general.text_log.clone(),
        html_log: config.general.html_log.clone(),
        title: config.general.title.clone(),
    }
}

/// Run the logger on real serial ports until SIGINT/SIGTERM.
pub async fn run_logger(config: SpyConfig) -> Result<()> {
    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match wait_for_shutdown_signal().await {
            Ok(signal) => tracing::info!(signal = signal, "shutdown signal received"),
            Err(e) => tracing::error!(error = %e, "signal handling unavailable"),
        }
        signal_token.cancel();
    });

    let sinks = sink_options(&config);
    let mut coordinator = Coordinator::new(config.channels, sinks, SerialTransport::new());
    let summary = coordinator.run(shutdown).await?;

    tracing::info!(
        reason = %summary.reason,
        channels = summary.channels,
        lines = summary.lines,
        "serial-spy stopped"
    );
    Ok(())
}

/// Result of `--validate`.
pub struct ValidationReport {
    pub channels: Vec<ChannelConfig>,
}

impl ValidationReport {
    /// Compile every channel without opening anything.
    pub fn build(config: &SpyConfig) -> Result<Self, SpyError> {
        let channels = compile_channels(&config.channels)?;
        Ok(Self { channels })
    }

    pub fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            w,
            "Configuration: {} ({} channel(s))",
            "VALID".green().bold(),
            self.channels.len()
        )?;
        for channel in &self.channels {
            writeln!(
                w,
                "  {}  {}  {}  {}  stamp={}  filters={}  replacements={}  remanence={}",
                channel.label(),
                channel.port,
                channel.options.summary(),
                channel.format,
                channel.stamp,
                channel.filters.len(),
                channel.replacements.len(),
                channel.remanence
            )?;
        }
        Ok(())
    }
}

/// Result of `--list-ports`.
pub struct PortListing {
    pub ports: Vec<PortSummary>,
}

impl PortListing {
    pub fn build() -> Result<Self, SpyError> {
        Ok(Self {
            ports: list_ports()?,
        })
    }

    pub fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        if self.ports.is_empty() {
            writeln!(w, "{}", "No serial ports found.".yellow())?;
            return Ok(());
        }
        for port in &self.ports {
            writeln!(w, "{}  {}", port.name.bold(), port.kind)?;
        }
        Ok(())
    }
}
