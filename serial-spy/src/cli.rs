//! CLI argument definitions for serial-spy.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use serial_spy_core::config::GeneralConfig;

/// Multi-channel serial frame logger.
///
/// Opens every channel listed in the configuration file, splits each byte
/// stream into frames and logs them to the console and optional text/HTML files.
#[derive(Parser, Debug)]
#[command(name = "serial-spy")]
#[command(version, about, long_about = None)]
pub struct SpyCli {
    /// Path to the JSON channel configuration file.
    #[arg(required_unless_present = "list_ports")]
    pub config: Option<PathBuf>,

    /// Write a plain-text log to this file (overrides the config file).
    #[arg(long)]
    pub text_log: Option<PathBuf>,

    /// Write an HTML log to this file (overrides the config file).
    #[arg(long)]
    pub html_log: Option<PathBuf>,

    /// Title of the HTML log.
    #[arg(long)]
    pub title: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate the configuration and exit without opening any port.
    #[arg(long)]
    pub validate: bool,

    /// List available serial ports and exit.
    #[arg(long)]
    pub list_ports: bool,
}

impl SpyCli {
    /// Apply command-line overrides on top of the loaded general section.
    pub fn apply_overrides(&self, general: &mut GeneralConfig) {
        if let Some(path) = &self.text_log {
            general.text_log = Some(path.clone());
        }
        if let Some(path) = &self.html_log {
            general.html_log = Some(path.clone());
        }
        if let Some(title) = &self.title {
            general.title = title.clone();
        }
        if let Some(level) = &self.log_level {
            general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            general.log_format = format.clone();
        }
    }
}
