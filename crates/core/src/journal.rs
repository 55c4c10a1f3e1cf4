// Journal - per-run log aggregation and suite-level reporting.
//
// Every record is mirrored to `tracing`, so entries reach the console as
// they happen and the report afterwards. Rendering stays plain text and
// JSON; the report is data, not presentation.

use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info, warn};

/// Severity of one journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Milliseconds since the journal was opened.
    pub offset_ms: u64,
    pub level: Level,
    pub message: String,
}

/// Collects diagnostic entries for one named run.
pub struct Journal {
    name: String,
    started: Instant,
    entries: Mutex<Vec<Entry>>,
}

impl Journal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(Level::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.record(Level::Success, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.record(Level::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(Level::Error, message.into());
    }

    /// Records a step marker at info level.
    pub fn step(&self, name: &str) {
        self.info(format!("step: {name}"));
    }

    fn record(&self, level: Level, message: String) {
        match level {
            Level::Error => error!(target: "holdfast", run = %self.name, "{message}"),
            Level::Warning => warn!(target: "holdfast", run = %self.name, "{message}"),
            _ => info!(target: "holdfast", run = %self.name, "{message}"),
        }
        self.entries.lock().push(Entry {
            offset_ms: self.started.elapsed().as_millis() as u64,
            level,
            message,
        });
    }

    /// Snapshot of the run so far. A run passes when it recorded no
    /// error-level entries.
    pub fn summary(&self) -> RunSummary {
        let entries = self.entries.lock().clone();
        let counts = LevelCounts {
            info: entries.iter().filter(|e| e.level == Level::Info).count(),
            success: entries.iter().filter(|e| e.level == Level::Success).count(),
            warning: entries.iter().filter(|e| e.level == Level::Warning).count(),
            error: entries.iter().filter(|e| e.level == Level::Error).count(),
        };
        RunSummary {
            name: self.name.clone(),
            duration_ms: self.started.elapsed().as_millis() as u64,
            passed: counts.error == 0,
            counts,
            entries,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelCounts {
    pub info: usize,
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub name: String,
    pub duration_ms: u64,
    pub passed: bool,
    pub counts: LevelCounts,
    pub entries: Vec<Entry>,
}

/// Aggregates run summaries for a whole suite.
#[derive(Debug, Default, Serialize)]
pub struct SuiteReport {
    runs: Vec<RunSummary>,
}

impl SuiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, summary: RunSummary) {
        self.runs.push(summary);
    }

    pub fn total(&self) -> usize {
        self.runs.len()
    }

    pub fn passed(&self) -> usize {
        self.runs.iter().filter(|run| run.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn success_rate(&self) -> f64 {
        if self.runs.is_empty() {
            100.0
        } else {
            self.passed() as f64 / self.total() as f64 * 100.0
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Plain-text summary for the console.
    pub fn render_text(&self) -> String {
        let bar = "=".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "{bar}");
        let _ = writeln!(out, "TEST EXECUTION SUMMARY");
        let _ = writeln!(out, "{bar}");
        let _ = writeln!(out, "Total runs: {}", self.total());
        let _ = writeln!(out, "Passed: {}", self.passed());
        let _ = writeln!(out, "Failed: {}", self.failed());
        let _ = writeln!(out, "Success rate: {:.1}%", self.success_rate());
        let _ = writeln!(out, "{bar}");

        if self.failed() > 0 {
            let _ = writeln!(out, "Failed runs:");
            for run in self.runs.iter().filter(|run| !run.passed) {
                let _ = writeln!(out, "  - {} ({} errors)", run.name, run.counts.error);
            }
        }
        out
    }
}
