//! In-memory sink for asserting on log output in tests.

use super::format::LineFormat;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::Dispatch;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects every event, at every level, formatted with [`LineFormat`].
pub struct CapturedLogs {
    buffer: SharedBuffer,
    dispatch: Dispatch,
}

impl CapturedLogs {
    pub fn new(name: &str) -> Self {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(LineFormat::new(name))
                .with_ansi(false)
                .with_writer(move || writer.clone()),
        );

        Self {
            buffer,
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.buffer.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Lines logged at `level` (`"INFO"`, `"WARN"`, `"ERROR"`, ...).
    pub fn at_level(&self, level: &str) -> Vec<String> {
        let marker = format!(" - {} - ", level);
        self.lines()
            .into_iter()
            .filter(|line| line.contains(&marker))
            .collect()
    }
}
