// Page loading - retrying navigation that rides out bot-challenge
// interstitials before concluding a page is ready.
//
// Each attempt walks a small state machine so every timeout bound is
// auditable: Navigating -> SettleDelay -> ChallengeCheck ->
// [PollingChallenge ->] Verifying. Failed attempts back off and retry;
// running out of attempts yields `LoadOutcome::Exhausted`, a value the
// caller treats as "proceed best-effort", never an error.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{DriverError, Result};
use crate::page::Page;
use crate::selector::Query;

/// Bound on one navigation, sized for slow challenge-fronted origins.
const NAV_TIMEOUT: Duration = Duration::from_secs(90);
/// Pause after navigation so client-side challenge scripts can run.
const SETTLE_DELAY: Duration = Duration::from_secs(3);
/// Upper bound on waiting for an interstitial title to clear.
const CHALLENGE_TIMEOUT: Duration = Duration::from_secs(30);
/// Network-settle bound applied after a challenge clears.
const POST_CHALLENGE_SETTLE: Duration = Duration::from_secs(30);
/// Fixed delay between failed attempts.
const RETRY_BACKOFF: Duration = Duration::from_secs(5);
/// Poll cadence while waiting for a challenge to clear.
const CHALLENGE_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Titles this short never count as page identity on an entry path.
const MIN_TITLE_LEN: usize = 5;
/// Script-init pause inside the readiness probe.
const READY_SCRIPT_DELAY: Duration = Duration::from_secs(2);
/// Bound on the readiness probe's body check.
const READY_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const READY_PROBE_INTERVAL: Duration = Duration::from_millis(250);

/// Default number of attempts per `load` call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Case-sensitive title substrings that mark a bot-challenge interstitial.
const INTERSTITIAL_MARKERS: [&str; 2] = ["Just a moment", "Checking your browser"];
/// Clearance polling matches a broader marker set than detection.
const CLEARANCE_MARKERS: [&str; 2] = ["Just a moment", "Checking"];

/// Tunables for `PageLoader`. `Default` carries the production values.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub max_attempts: u32,
    pub nav_timeout: Duration,
    pub settle_delay: Duration,
    pub challenge_timeout: Duration,
    pub post_challenge_settle: Duration,
    pub retry_backoff: Duration,
    pub challenge_poll_interval: Duration,
    /// Title substrings that identify the expected site.
    pub identity_markers: Vec<String>,
    /// URL fragments accepted as known entry points.
    pub entry_paths: Vec<String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            nav_timeout: NAV_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            challenge_timeout: CHALLENGE_TIMEOUT,
            post_challenge_settle: POST_CHALLENGE_SETTLE,
            retry_backoff: RETRY_BACKOFF,
            challenge_poll_interval: CHALLENGE_POLL_INTERVAL,
            identity_markers: Vec::new(),
            entry_paths: vec!["index.php".to_string()],
        }
    }
}

impl LoadConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Adds a title substring that identifies the expected site.
    pub fn with_identity_marker(mut self, marker: impl Into<String>) -> Self {
        self.identity_markers.push(marker.into());
        self
    }

    /// Adds a URL fragment accepted as a known entry point.
    pub fn with_entry_path(mut self, path: impl Into<String>) -> Self {
        self.entry_paths.push(path.into());
        self
    }
}

/// Result of one `load` call.
///
/// `Exhausted` is a signal, not an error: the suite favors continuing
/// best-effort over aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Succeeded { title: String, attempts: u32 },
    Exhausted { attempts: u32 },
}

impl LoadOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, LoadOutcome::Succeeded { .. })
    }
}

/// Why one attempt failed. Logged and counted, never raised.
#[derive(Debug)]
enum AttemptFailure {
    Navigation(DriverError),
    ChallengeTimeout(Duration),
    UnexpectedTitle(String),
    Driver(DriverError),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Navigation(err) => write!(f, "navigation: {err}"),
            AttemptFailure::ChallengeTimeout(timeout) => {
                write!(f, "challenge did not clear within {timeout:?}")
            }
            AttemptFailure::UnexpectedTitle(title) => {
                write!(f, "unexpected page title \"{title}\"")
            }
            AttemptFailure::Driver(err) => write!(f, "driver: {err}"),
        }
    }
}

/// Named states of one load attempt.
enum AttemptState {
    Navigating,
    SettleDelay,
    ChallengeCheck,
    PollingChallenge,
    Verifying,
}

pub struct PageLoader<C: Clock = SystemClock> {
    config: LoadConfig,
    clock: C,
}

impl PageLoader {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> PageLoader<C> {
    pub fn with_clock(config: LoadConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Loads `url`, retrying past navigation errors and interstitials.
    ///
    /// Returns on the first attempt whose final title passes the identity
    /// check; backs off between failed attempts.
    pub async fn load<P: Page>(&self, page: &P, url: &str) -> LoadOutcome {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!(target: "holdfast.load", %url, attempt, max_attempts, "loading");

            match self.run_attempt(page, url).await {
                Ok(title) => {
                    info!(target: "holdfast.load", %url, attempt, %title, "page loaded");
                    return LoadOutcome::Succeeded { title, attempts: attempt };
                }
                Err(failure) => {
                    warn!(target: "holdfast.load", %url, attempt, %failure, "attempt failed");
                    if attempt < max_attempts {
                        self.clock.sleep(self.config.retry_backoff).await;
                    }
                }
            }
        }

        warn!(target: "holdfast.load", %url, attempts = max_attempts, "all attempts exhausted");
        LoadOutcome::Exhausted { attempts: max_attempts }
    }

    async fn run_attempt<P: Page>(
        &self,
        page: &P,
        url: &str,
    ) -> std::result::Result<String, AttemptFailure> {
        let mut state = AttemptState::Navigating;
        loop {
            state = match state {
                AttemptState::Navigating => {
                    page.goto(url, self.config.nav_timeout)
                        .await
                        .map_err(AttemptFailure::Navigation)?;
                    AttemptState::SettleDelay
                }
                AttemptState::SettleDelay => {
                    self.clock.sleep(self.config.settle_delay).await;
                    AttemptState::ChallengeCheck
                }
                AttemptState::ChallengeCheck => {
                    let title = page.title().await.map_err(AttemptFailure::Driver)?;
                    debug!(target: "holdfast.load", %title, "observed title");
                    if is_interstitial(&title) {
                        debug!(target: "holdfast.load", %title, "challenge detected");
                        AttemptState::PollingChallenge
                    } else {
                        AttemptState::Verifying
                    }
                }
                AttemptState::PollingChallenge => {
                    self.poll_challenge(page).await?;
                    page.settle(self.config.post_challenge_settle)
                        .await
                        .map_err(AttemptFailure::Driver)?;
                    AttemptState::Verifying
                }
                AttemptState::Verifying => {
                    let title = page.title().await.map_err(AttemptFailure::Driver)?;
                    if self.identity_ok(url, &title) {
                        return Ok(title);
                    }
                    return Err(AttemptFailure::UnexpectedTitle(title));
                }
            };
        }
    }

    /// Polls the title until no clearance marker matches, bounded by the
    /// challenge timeout. A bound hit fails the attempt, not the call.
    async fn poll_challenge<P: Page>(
        &self,
        page: &P,
    ) -> std::result::Result<(), AttemptFailure> {
        let deadline = self.clock.now() + self.config.challenge_timeout;
        loop {
            let title = page.title().await.map_err(AttemptFailure::Driver)?;
            if !still_challenged(&title) {
                debug!(target: "holdfast.load", %title, "challenge cleared");
                return Ok(());
            }
            if self.clock.now() >= deadline {
                return Err(AttemptFailure::ChallengeTimeout(self.config.challenge_timeout));
            }
            self.clock.sleep(self.config.challenge_poll_interval).await;
        }
    }

    /// The original suite's page-identity heuristic, preserved as-is: a
    /// known identity marker in the title, or a known entry path with a
    /// non-trivial, non-interstitial title.
    fn identity_ok(&self, url: &str, title: &str) -> bool {
        if self
            .config
            .identity_markers
            .iter()
            .any(|marker| title.contains(marker.as_str()))
        {
            return true;
        }
        self.config
            .entry_paths
            .iter()
            .any(|path| url.contains(path.as_str()))
            && title.len() > MIN_TITLE_LEN
            && !is_interstitial(title)
    }

    /// Best-effort readiness probe: settle, give page scripts a beat,
    /// settle again, then wait for the body to grow children.
    ///
    /// An empty body only logs a warning; a backend failure propagates.
    pub async fn wait_ready<P: Page>(&self, page: &P) -> Result<()> {
        page.settle(self.config.post_challenge_settle).await?;
        self.clock.sleep(READY_SCRIPT_DELAY).await;
        page.settle(self.config.post_challenge_settle).await?;

        let body_content = Query::Css("body > *".to_string());
        let deadline = self.clock.now() + READY_PROBE_TIMEOUT;
        loop {
            if page.first(&body_content).await?.is_some() {
                debug!(target: "holdfast.load", "page ready");
                return Ok(());
            }
            if self.clock.now() >= deadline {
                warn!(target: "holdfast.load", "readiness probe found an empty body");
                return Ok(());
            }
            self.clock.sleep(READY_PROBE_INTERVAL).await;
        }
    }
}

fn is_interstitial(title: &str) -> bool {
    INTERSTITIAL_MARKERS.iter().any(|marker| title.contains(marker))
}

fn still_challenged(title: &str) -> bool {
    CLEARANCE_MARKERS.iter().any(|marker| title.contains(marker))
}
