//! Diagnostic logging for serial-spy.
//!
//! Frame lines are the product and go to stdout through the console sink.
//! Everything emitted with `tracing` (port lifecycle, sink failures, state
//! changes) is a diagnostic and goes to stderr, so piping stdout into a file
//! captures the frame log alone.

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use serial_spy_core::config::GeneralConfig;

/// Install the global subscriber from `general.log_level` / `general.log_format`.
///
/// A `RUST_LOG` directive replaces `log_level`, e.g.
/// `RUST_LOG=serial_spy_pipeline=trace` to watch filtered frames.
pub fn init_tracing(general: &GeneralConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&general.log_level));
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match general.log_format.as_str() {
        "json" => registry.with(layer.json()).try_init(),
        "pretty" => registry.with(layer.pretty()).try_init(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };
    installed.map_err(|e| {
        anyhow::anyhow!(
            "cannot install {} diagnostics subscriber: {e}",
            general.log_format
        )
    })
}
