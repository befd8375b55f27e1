//! Scriptable mock transport for coordinator tests.
//!
//! Each channel can be given a list of events that are queued as soon as
//! the channel is opened. By default the mock drops its event sender right
//! after queuing, so the coordinator sees every channel go away once the
//! script is consumed. `keep_open` holds the sender until `close`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use tokio::sync::mpsc;

use serial_spy_core::error::TransportError;
use serial_spy_pipeline::{
    ChannelConfig, ChannelEvent, FramePipelineError, Transport, TransportEvent, TransportHandle,
};

/// A mock transport that records open/close calls.
#[derive(Default)]
pub struct MockTransport {
    scripts: HashMap<usize, Vec<TransportEvent>>,
    failing: HashSet<usize>,
    keep_open: bool,
    /// Ports passed to `open`, in call order.
    pub opened: Vec<String>,
    closed: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `events` on `channel` when it opens.
    pub fn script(mut self, channel: usize, events: Vec<TransportEvent>) -> Self {
        self.scripts.insert(channel, events);
        self
    }

    /// Make `open` fail for `channel`.
    pub fn failing_open(mut self, channel: usize) -> Self {
        self.failing.insert(channel);
        self
    }

    /// Hold every event sender until the handle is closed.
    pub fn keep_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    /// Number of handles closed so far.
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    fn open(
        &mut self,
        config: &ChannelConfig,
        events: mpsc::Sender<ChannelEvent>,
    ) -> Result<Box<dyn TransportHandle>, FramePipelineError> {
        self.opened.push(config.port.clone());

        if self.failing.contains(&config.index) {
            return Err(TransportError::Open {
                port: config.port.clone(),
                reason: "mock open failure".to_owned(),
            }
            .into());
        }

        for event in self.scripts.remove(&config.index).unwrap_or_default() {
            events
                .try_send(ChannelEvent::new(config.index, event))
                .map_err(|e| FramePipelineError::EventChannel(e.to_string()))?;
        }

        Ok(Box::new(MockHandle {
            events: self.keep_open.then_some(events),
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct MockHandle {
    events: Option<mpsc::Sender<ChannelEvent>>,
    closed: Arc<AtomicUsize>,
}

impl TransportHandle for MockHandle {
    fn close(&mut self) -> Result<(), FramePipelineError> {
        self.events.take();
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// `Data` event from a static byte string.
#[allow(dead_code)]
pub fn data(bytes: &'static [u8]) -> TransportEvent {
    TransportEvent::Data(Bytes::from_static(bytes))
}
