//! Serial port transport backed by the `serialport` crate.
//!
//! Each channel gets a dedicated reader thread that polls the port with a short
//! timeout and forwards raw chunks to the coordinator's event channel. Closing
//! a channel raises the stop flag and joins the thread.

use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use serial_spy_core::error::TransportError;
use serial_spy_core::types::{Parity, SerialOptions};
use serial_spy_pipeline::{
    ChannelConfig, ChannelEvent, FramePipelineError, Transport, TransportEvent, TransportHandle,
};

/// Poll interval of the reader thread; bounds how long `close` waits.
const READ_TIMEOUT: Duration = Duration::from_millis(10);
/// Size of a single read.
const READ_BUFFER_SIZE: usize = 4096;
/// Back-off while the event channel is full.
const BACKPRESSURE_WAIT: Duration = Duration::from_millis(1);

/// Opens real serial ports.
#[derive(Debug, Default)]
pub struct SerialTransport;

impl SerialTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for SerialTransport {
    fn open(
        &mut self,
        config: &ChannelConfig,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Box<dyn TransportHandle>, FramePipelineError> {
        let stop = Arc::new(AtomicBool::new(false));
        let reader = PortReader {
            channel: config.index,
            port: config.port.clone(),
            options: config.options,
            stop: Arc::clone(&stop),
            events,
        };

        let thread = std::thread::Builder::new()
            .name(format!("serial-{}", config.label()))
            .spawn(move || reader.run())?;

        tracing::debug!(channel = config.index, port = %config.port, "reader thread started");
        Ok(Box::new(SerialHandle {
            port: config.port.clone(),
            stop,
            thread: Some(thread),
        }))
    }
}

/// Handle to a running reader thread.
struct SerialHandle {
    port: String,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TransportHandle for SerialHandle {
    fn close(&mut self) -> Result<(), FramePipelineError> {
        self.stop.store(true, Ordering::SeqCst);
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        thread.join().map_err(|_| {
            FramePipelineError::Transport(TransportError::Read {
                port: self.port.clone(),
                reason: "reader thread panicked".to_owned(),
            })
        })?;
        tracing::debug!(port = %self.port, "reader thread stopped");
        Ok(())
    }
}

impl Drop for SerialHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
    }
}

struct PortReader {
    channel: usize,
    port: String,
    options: SerialOptions,
    stop: Arc<AtomicBool>,
    events: mpsc::Sender<ChannelEvent>,
}

impl PortReader {
    fn run(self) {
        let mut port = match serialport::new(&self.port, self.options.baud_rate)
            .data_bits(to_data_bits(self.options.data_bits))
            .parity(to_parity(self.options.parity))
            .stop_bits(to_stop_bits(self.options.stop_bits))
            .timeout(READ_TIMEOUT)
            .open()
        {
            Ok(port) => port,
            Err(e) => {
                let err = TransportError::Open {
                    port: self.port.clone(),
                    reason: e.to_string(),
                };
                self.deliver(TransportEvent::Error(err.to_string()));
                return;
            }
        };

        tracing::info!(
            port = %self.port,
            settings = %self.options.summary(),
            "serial port opened"
        );
        if !self.deliver(TransportEvent::Open) {
            return;
        }

        let mut buf = [0u8; READ_BUFFER_SIZE];
        while !self.stop.load(Ordering::SeqCst) {
            match port.read(&mut buf) {
                Ok(0) => {}
                Ok(n) => {
                    if !self.deliver(TransportEvent::Data(Bytes::copy_from_slice(&buf[..n]))) {
                        return;
                    }
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {}
                Err(e) => {
                    let err = TransportError::Read {
                        port: self.port.clone(),
                        reason: e.to_string(),
                    };
                    self.deliver(TransportEvent::Error(err.to_string()));
                    self.deliver(TransportEvent::Close);
                    return;
                }
            }
        }
    }

    /// Forward one event. Returns `false` when the reader should stop.
    fn deliver(&self, event: TransportEvent) -> bool {
        let mut pending = ChannelEvent::new(self.channel, event);
        loop {
            match self.events.try_send(pending) {
                Ok(()) => return true,
                Err(TrySendError::Closed(_)) => return false,
                Err(TrySendError::Full(back)) => {
                    if self.stop.load(Ordering::SeqCst) {
                        return false;
                    }
                    pending = back;
                    std::thread::sleep(BACKPRESSURE_WAIT);
                }
            }
        }
    }
}

fn to_data_bits(bits: u8) -> serialport::DataBits {
    match bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        _ => serialport::DataBits::Eight,
    }
}

fn to_parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn to_stop_bits(bits: u8) -> serialport::StopBits {
    match bits {
        2 => serialport::StopBits::Two,
        _ => serialport::StopBits::One,
    }
}

/// One entry of `--list-ports`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub kind: String,
}

/// Enumerate serial ports available on this machine.
pub fn list_ports() -> Result<Vec<PortSummary>, TransportError> {
    let ports =
        serialport::available_ports().map_err(|e| TransportError::Enumerate(e.to_string()))?;

    Ok(ports
        .into_iter()
        .map(|p| {
            let kind = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => match info.product {
                    Some(product) => format!("USB {:04x}:{:04x} {product}", info.vid, info.pid),
                    None => format!("USB {:04x}:{:04x}", info.vid, info.pid),
                },
                serialport::SerialPortType::BluetoothPort => "Bluetooth".to_owned(),
                serialport::SerialPortType::PciPort => "PCI".to_owned(),
                serialport::SerialPortType::Unknown => "Unknown".to_owned(),
            };
            PortSummary {
                name: p.port_name,
                kind,
            }
        })
        .collect())
}
