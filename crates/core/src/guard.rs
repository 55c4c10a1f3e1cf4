//! Converts guarded-block failures into warnings in relaxed mode.

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};

use crate::journal::Journal;

/// How failures inside a guarded block are treated.
///
/// `Relaxed` marks the block as best-effort diagnostics against an
/// uncontrolled site; `Strict` lets failures gate the enclosing test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Strict,
    Relaxed,
}

impl ExecutionMode {
    /// Reads the conventional `CI` variable: set and non-empty means
    /// relaxed. Call this once at the process edge and pass the result
    /// down; the guard itself never touches the environment.
    pub fn from_env() -> Self {
        match std::env::var("CI") {
            Ok(value) if !value.is_empty() => ExecutionMode::Relaxed,
            _ => ExecutionMode::Strict,
        }
    }
}

/// Wraps a test body so its failure policy follows the execution mode.
pub struct TestGuard<'j> {
    mode: ExecutionMode,
    journal: Option<&'j Journal>,
}

impl<'j> TestGuard<'j> {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            journal: None,
        }
    }

    /// Mirrors guarded outcomes into `journal` as well as the log.
    pub fn with_journal(mut self, journal: &'j Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Runs `body` under `name`.
    ///
    /// A failure is logged either way; in relaxed mode it is swallowed and
    /// the call returns `Ok`, in strict mode the original error is
    /// returned unchanged.
    pub async fn run<F, Fut, E>(&self, name: &str, body: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        debug!(target: "holdfast.guard", %name, "starting");
        match body().await {
            Ok(()) => {
                debug!(target: "holdfast.guard", %name, "completed");
                if let Some(journal) = self.journal {
                    journal.success(format!("completed: {name}"));
                }
                Ok(())
            }
            Err(err) => match self.mode {
                ExecutionMode::Relaxed => {
                    warn!(target: "holdfast.guard", %name, error = %err, "continuing despite failure");
                    if let Some(journal) = self.journal {
                        journal.warning(format!("{name}: {err}"));
                    }
                    Ok(())
                }
                ExecutionMode::Strict => {
                    warn!(target: "holdfast.guard", %name, error = %err, "failed");
                    if let Some(journal) = self.journal {
                        journal.error(format!("{name}: {err}"));
                    }
                    Err(err)
                }
            },
        }
    }
}
