//! Diagnostic and user-facing output handle.
//!
//! The collector, applier and gist store never print or log directly. They
//! receive a `&dyn Reporter` and send diagnostics (`debug`..`error`) and
//! user-facing lines (`say`) through it. The binary wires up a
//! [`TracingReporter`]; tests use a [`MemoryReporter`] and inspect what was
//! recorded.

use std::cell::RefCell;
use std::io::Write;
use std::sync::Mutex;
use tracing::Level;

/// Sink for diagnostics and user-facing messages.
pub trait Reporter {
    /// Record a diagnostic at the given level.
    fn log(&self, level: Level, message: &str);

    /// Print a line meant for the person running the command.
    fn say(&self, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Reporter that emits `tracing` events and writes `say` lines to a writer.
pub struct TracingReporter<W: Write> {
    out: Mutex<W>,
}

impl TracingReporter<std::io::Stdout> {
    /// Reporter printing user-facing lines to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TracingReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write> Reporter for TracingReporter<W> {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{}", message),
            Level::WARN => tracing::warn!("{}", message),
            Level::INFO => tracing::info!("{}", message),
            Level::DEBUG => tracing::debug!("{}", message),
            _ => tracing::trace!("{}", message),
        }
    }

    fn say(&self, message: &str) {
        if let Ok(mut out) = self.out.lock() {
            // A closed stdout is not worth failing a sync over
            let _ = writeln!(out, "{}", message);
        }
    }
}

/// A single recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
}

/// Reporter that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: RefCell<Vec<Entry>>,
    said: RefCell<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics recorded so far.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    /// Diagnostics recorded at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Whether any diagnostic at `level` contains `needle`.
    pub fn has(&self, level: Level, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// User-facing lines recorded so far.
    pub fn said(&self) -> Vec<String> {
        self.said.borrow().clone()
    }
}

impl Reporter for MemoryReporter {
    fn log(&self, level: Level, message: &str) {
        self.entries.borrow_mut().push(Entry {
            level,
            message: message.to_string(),
        });
    }

    fn say(&self, message: &str) {
        self.said.borrow_mut().push(message.to_string());
    }
}
