use std::time::Duration;

use thiserror::Error;

use crate::selector::SelectorStrategy;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures produced by the automation backend.
///
/// Everything here is recoverable at some scope: a navigation error fails
/// one load attempt, a timeout fails one selector strategy.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Failures that escape to callers of the resilience layer.
#[derive(Debug, Error)]
pub enum Error {
    /// No strategy produced a match in either the visible pass or the
    /// existence-only fallback.
    #[error("could not find {description}: exhausted {} strategies in both passes", .tried.len())]
    NotFound {
        description: String,
        tried: Vec<SelectorStrategy>,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}
