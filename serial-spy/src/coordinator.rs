//! Channel lifecycle coordination -- validation, wiring, event loop, shutdown.
//!
//! The [`Coordinator`] owns every channel, the shared clock and the sink
//! fan-out. All pipeline work happens on the single task that drives
//! [`Coordinator::run`], so none of that state needs a lock.
//!
//! # State machine
//!
//! ```text
//! Validating -> Opening -> Running -> ShuttingDown -> Terminated
//! Validating -> Panicked -> ShuttingDown -> Terminated
//! ```
//!
//! # Shutdown
//!
//! 1. Request close on every transport handle
//! 2. Process events that were already delivered
//! 3. Emit a closed line for every channel not already closed
//! 4. Write the trailer and wait for every opened file sink to finish

use std::fmt;

use chrono::Local;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use serial_spy_core::config::ChannelSettings;
use serial_spy_core::error::{ChannelError, SpyError};
use serial_spy_pipeline::{
    ChannelEvent, ChannelRuntime, Clock, ConsoleSink, LogRecord, SinkFanout, SinkOptions,
    Transport, TransportEvent, TransportHandle, compile_channels,
};

/// Capacity of the transport -> coordinator event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

const PROGRAM: &str = "serial-spy";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Coordinator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Validating,
    Opening,
    Running,
    Panicked,
    ShuttingDown,
    Terminated,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::Opening => write!(f, "opening"),
            Self::Running => write!(f, "running"),
            Self::Panicked => write!(f, "panicked"),
            Self::ShuttingDown => write!(f, "shutting down"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Why the run ended.
    pub reason: String,
    /// Number of channels that were started.
    pub channels: usize,
    /// Number of frame lines written to the sinks.
    pub lines: u64,
}

/// Owns all channels and drives them from a single event loop.
pub struct Coordinator<T> {
    channels: Vec<ChannelSettings>,
    sinks: SinkOptions,
    transport: T,
    console: Option<ConsoleSink>,
    history: Vec<CoordinatorState>,
}

impl<T: Transport> Coordinator<T> {
    /// Create a coordinator for the given raw channel settings.
    pub fn new(channels: Vec<ChannelSettings>, sinks: SinkOptions, transport: T) -> Self {
        Self {
            channels,
            sinks,
            transport,
            console: None,
            history: Vec::new(),
        }
    }

    /// Replace the stdout console sink.
    pub fn with_console(mut self, console: ConsoleSink) -> Self {
        self.console = Some(console);
        self
    }

    /// Current state, `None` before `run` starts.
    pub fn state(&self) -> Option<CoordinatorState> {
        self.history.last().copied()
    }

    /// Every state entered so far, in order.
    pub fn history(&self) -> &[CoordinatorState] {
        &self.history
    }

    /// The transport, for inspection after a run.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate all channels, open them and log until `shutdown` fires
    /// or every transport has gone away.
    ///
    /// # Errors
    ///
    /// Returns [`SpyError::Channel`] when any channel fails validation. In
    /// that case no transport is opened, but the sinks still record the
    /// error and receive their trailer.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<RunSummary, SpyError> {
        let console = self.console.take().unwrap_or_else(ConsoleSink::stdout);

        self.enter(CoordinatorState::Validating);
        let configs = match compile_channels(&self.channels) {
            Ok(configs) => configs,
            Err(e) => return self.panic(e, console).await,
        };

        self.enter(CoordinatorState::Opening);
        let mut fanout = SinkFanout::open(&self.sinks, &configs, console).await;
        fanout
            .write(&LogRecord::Banner(banner(configs.len())))
            .await;

        let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut clock = Clock::new();
        let mut runtimes = Vec::with_capacity(configs.len());
        let mut handles: Vec<Box<dyn TransportHandle>> = Vec::with_capacity(configs.len());

        for config in configs {
            let mut runtime = ChannelRuntime::new(config);
            match self.transport.open(runtime.config(), tx.clone()) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    tracing::warn!(
                        channel = runtime.config().index,
                        error = %e,
                        "failed to start channel"
                    );
                    let records = runtime.handle(TransportEvent::Error(e.to_string()), &mut clock);
                    write_all(&mut fanout, &records).await;
                }
            }
            runtimes.push(runtime);
        }
        drop(tx);

        self.enter(CoordinatorState::Running);
        let mut lines = 0u64;
        let reason = loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => break "termination requested",
                event = rx.recv() => match event {
                    Some(event) => {
                        lines += dispatch(&mut runtimes, event, &mut clock, &mut fanout).await;
                    }
                    None => break "all channels closed",
                },
            }
        };
        tracing::info!(reason = reason, "stopping channels");

        self.enter(CoordinatorState::ShuttingDown);
        close_transports(handles).await;
        while let Ok(event) = rx.try_recv() {
            lines += dispatch(&mut runtimes, event, &mut clock, &mut fanout).await;
        }
        for runtime in runtimes.iter_mut() {
            let records = runtime.shutdown(&mut clock);
            lines += write_all(&mut fanout, &records).await;
        }

        if let Err(e) = fanout.close(&trailer(reason)).await {
            tracing::warn!(error = %e, "log files were not finalized cleanly");
        }
        self.enter(CoordinatorState::Terminated);

        Ok(RunSummary {
            reason: reason.to_owned(),
            channels: runtimes.len(),
            lines,
        })
    }

    async fn panic(
        &mut self,
        err: ChannelError,
        console: ConsoleSink,
    ) -> Result<RunSummary, SpyError> {
        self.enter(CoordinatorState::Panicked);
        tracing::error!(error = %err, "channel configuration rejected");

        let mut fanout = SinkFanout::open(&self.sinks, &[], console).await;
        fanout.write(&LogRecord::Panic(err.to_string())).await;

        self.enter(CoordinatorState::ShuttingDown);
        if let Err(e) = fanout.close(&trailer("configuration error")).await {
            tracing::warn!(error = %e, "log files were not finalized cleanly");
        }
        self.enter(CoordinatorState::Terminated);

        Err(SpyError::Channel(err))
    }

    fn enter(&mut self, state: CoordinatorState) {
        tracing::debug!(state = %state, "coordinator state");
        self.history.push(state);
    }
}

/// Close every transport handle off the async workers, since closing may
/// join a reader thread.
async fn close_transports(handles: Vec<Box<dyn TransportHandle>>) {
    let closing = tokio::task::spawn_blocking(move || {
        handles
            .into_iter()
            .map(|mut handle| handle.close())
            .collect::<Vec<_>>()
    });

    match closing.await {
        Ok(results) => {
            for err in results.into_iter().filter_map(Result::err) {
                tracing::warn!(error = %err, "transport did not close cleanly");
            }
        }
        Err(e) => tracing::warn!(error = %e, "spawn_blocking failed while closing transports"),
    }
}

/// Route one transport event to its channel. Returns the number of lines written.
async fn dispatch(
    runtimes: &mut [ChannelRuntime],
    event: ChannelEvent,
    clock: &mut Clock,
    fanout: &mut SinkFanout,
) -> u64 {
    let Some(runtime) = runtimes.get_mut(event.channel) else {
        tracing::warn!(channel = event.channel, "event for unknown channel dropped");
        return 0;
    };

    let records = runtime.handle(event.event, clock);
    write_all(fanout, &records).await
}

/// Write records in order. Returns the number of frame lines among them.
async fn write_all(fanout: &mut SinkFanout, records: &[LogRecord]) -> u64 {
    let mut lines = 0;
    for record in records {
        fanout.write(record).await;
        if matches!(record, LogRecord::Line(_)) {
            lines += 1;
        }
    }
    lines
}

/// Startup banner written to every sink.
pub fn banner(channels: usize) -> String {
    format!(
        "{PROGRAM} {} started {}, {channels} channel(s)",
        env!("CARGO_PKG_VERSION"),
        Local::now().format(TIME_FORMAT)
    )
}

/// Trailer appended to the file sinks at shutdown.
pub fn trailer(reason: &str) -> String {
    format!("{PROGRAM} stopped {}: {reason}", Local::now().format(TIME_FORMAT))
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
///
/// # Errors
///
/// Returns an error if signal handlers cannot be installed.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> anyhow::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> anyhow::Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("failed to install Ctrl+C handler: {}", e))?;
    Ok("Ctrl+C")
}
