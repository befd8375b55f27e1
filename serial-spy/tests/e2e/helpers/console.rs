//! Console capture for E2E tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serial_spy_pipeline::ConsoleSink;

/// Shared in-memory buffer standing in for stdout.
#[derive(Clone, Default)]
pub struct CapturedConsole(Arc<Mutex<Vec<u8>>>);

impl CapturedConsole {
    /// A colorless console sink writing into this buffer.
    pub fn sink(&self) -> ConsoleSink {
        ConsoleSink::new(Box::new(self.clone()), false)
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for CapturedConsole {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
