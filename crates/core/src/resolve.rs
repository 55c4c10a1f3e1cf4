// Element resolution - ordered strategies, visible-match first, then an
// existence-only fallback.
//
// Pass 1 gives each strategy an even share of the caller's budget and
// waits for a visible match; the first success wins and later strategies
// are never tried. Pass 2 runs only after pass 1 exhausts every strategy,
// accepting a node that exists but has not become visible yet (content on
// slow pages can be present before layout).

use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{DriverError, Error, Result};
use crate::page::Page;
use crate::selector::SelectorStrategy;

/// One strategy probe and how it went. Emitted as structured log events;
/// not persisted.
#[derive(Debug)]
pub struct ResolutionAttempt {
    pub strategy: SelectorStrategy,
    pub outcome: AttemptOutcome,
    pub elapsed: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    Found,
    Timeout,
    Error(String),
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Found => write!(f, "found"),
            AttemptOutcome::Timeout => write!(f, "timeout"),
            AttemptOutcome::Error(message) => write!(f, "error: {message}"),
        }
    }
}

pub struct ElementResolver<C: Clock = SystemClock> {
    clock: C,
}

impl ElementResolver {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for ElementResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ElementResolver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Tries `strategies` in caller order and returns the first visible
    /// match, falling back to any existing node once every strategy has
    /// been tried.
    ///
    /// The budget is split evenly across strategies on the first pass, so
    /// total wall-clock stays bounded by `budget`. Fails with
    /// [`Error::NotFound`] when both passes exhaust the list.
    pub async fn find<P: Page>(
        &self,
        page: &P,
        strategies: &[SelectorStrategy],
        description: &str,
        budget: Duration,
    ) -> Result<P::Element> {
        if strategies.is_empty() {
            return Err(Error::NotFound {
                description: description.to_string(),
                tried: Vec::new(),
            });
        }

        debug!(
            target: "holdfast.resolve",
            %description,
            strategies = strategies.len(),
            budget_ms = budget.as_millis() as u64,
            "resolving"
        );

        let share = budget / strategies.len() as u32;
        for strategy in strategies {
            let started = self.clock.now();
            match page.wait_visible(&strategy.to_query(), share).await {
                Ok(element) => {
                    self.log_attempt(description, ResolutionAttempt {
                        strategy: strategy.clone(),
                        outcome: AttemptOutcome::Found,
                        elapsed: self.clock.now().saturating_duration_since(started),
                    });
                    return Ok(element);
                }
                Err(err) => {
                    let outcome = match err {
                        DriverError::Timeout(_) => AttemptOutcome::Timeout,
                        other => AttemptOutcome::Error(other.to_string()),
                    };
                    self.log_attempt(description, ResolutionAttempt {
                        strategy: strategy.clone(),
                        outcome,
                        elapsed: self.clock.now().saturating_duration_since(started),
                    });
                }
            }
        }

        debug!(target: "holdfast.resolve", %description, "visible pass exhausted; checking existence");
        for strategy in strategies {
            match page.first(&strategy.to_query()).await {
                Ok(Some(element)) => {
                    warn!(
                        target: "holdfast.resolve",
                        %description,
                        strategy = %strategy,
                        "matched a node that is not yet visible"
                    );
                    return Ok(element);
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(
                        target: "holdfast.resolve",
                        %description,
                        strategy = %strategy,
                        error = %err,
                        "existence probe failed"
                    );
                }
            }
        }

        Err(Error::NotFound {
            description: description.to_string(),
            tried: strategies.to_vec(),
        })
    }

    fn log_attempt(&self, description: &str, attempt: ResolutionAttempt) {
        debug!(
            target: "holdfast.resolve",
            %description,
            strategy = %attempt.strategy,
            outcome = %attempt.outcome,
            elapsed_ms = attempt.elapsed.as_millis() as u64,
            "strategy tried"
        );
    }
}
