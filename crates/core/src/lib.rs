// holdfast: resilience layer for end-to-end suites that target slow,
// uncontrolled, or bot-protected websites.
//
// The automation backend stays behind the `Page` trait and timers stay
// behind the `Clock` trait, so every timeout budget in the layer can be
// exercised against fakes without real timers or a real browser.

pub mod clock;
pub mod error;
pub mod guard;
pub mod journal;
pub mod load;
pub mod page;
pub mod resolve;
pub mod selector;

use std::time::Duration;

/// Default budget for one `ElementResolver::find` call.
///
/// Split evenly across the candidate strategies on the visible-match pass.
pub const DEFAULT_FIND_BUDGET: Duration = Duration::from_secs(15);

pub use clock::{Clock, SystemClock};
pub use error::{DriverError, Error, Result};
pub use guard::{ExecutionMode, TestGuard};
pub use journal::{Journal, Level, RunSummary, SuiteReport};
pub use load::{LoadConfig, LoadOutcome, PageLoader};
pub use page::Page;
pub use resolve::ElementResolver;
pub use selector::{Query, SelectorStrategy};
