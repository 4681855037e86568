//! Progress reporting.
//!
//! Long-running operations report human-readable progress through a
//! [`ReportSink`] so the CLI can print while library tests capture.

use std::sync::Mutex;

/// Severity of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

/// Receiver for progress lines.
pub trait ReportSink {
    fn report(&self, level: ReportLevel, message: &str);

    fn info(&self, message: &str) {
        self.report(ReportLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(ReportLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.report(ReportLevel::Error, message);
    }
}

/// Prints info to stdout and warnings and errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn report(&self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => println!("{message}"),
            ReportLevel::Warn => eprintln!("warning: {message}"),
            ReportLevel::Error => eprintln!("error: {message}"),
        }
    }
}

/// Collects report lines in memory. Intended for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(ReportLevel, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// True when any recorded line contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .any(|(_, line)| line.contains(needle))
    }
}

impl ReportSink for RecordingSink {
    fn report(&self, level: ReportLevel, message: &str) {
        self.lines
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
