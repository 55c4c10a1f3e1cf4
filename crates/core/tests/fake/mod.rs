//! Scriptable fakes for driving the resilience layer without a browser
//! or real timers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use holdfast::page::Page;
use holdfast::{Clock, DriverError, Query};

/// Virtual clock: sleeps advance time instantly and are recorded.
#[derive(Clone)]
pub struct FakeClock {
    inner: Arc<ClockInner>,
}

struct ClockInner {
    base: Instant,
    advanced: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ClockInner {
                base: Instant::now(),
                advanced: Mutex::new(Duration::ZERO),
                sleeps: Mutex::new(Vec::new()),
            }),
        }
    }

    /// All sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.sleeps.lock().clone()
    }

    /// Total virtual time advanced by sleeps.
    pub fn elapsed(&self) -> Duration {
        *self.inner.advanced.lock()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.base + *self.inner.advanced.lock()
    }

    async fn sleep(&self, duration: Duration) {
        *self.inner.advanced.lock() += duration;
        self.inner.sleeps.lock().push(duration);
    }
}

/// What a query resolves to in the fake document.
#[derive(Debug, Clone, Copy)]
pub enum QueryBehavior {
    /// A visible node; `wait_visible` succeeds with this element.
    Visible(&'static str),
    /// A node that exists but never becomes visible.
    Hidden(&'static str),
    /// No matching node.
    Absent,
    /// The backend errors on any probe of this query.
    Broken(&'static str),
}

/// Scriptable page: navigation outcomes and titles are consumed in
/// order, query behaviors are keyed by compiled query. Every call is
/// recorded so tests can assert what was (and was not) tried.
pub struct FakePage {
    goto_outcomes: Mutex<VecDeque<Result<(), String>>>,
    titles: Mutex<VecDeque<String>>,
    behaviors: Mutex<Vec<(Query, QueryBehavior)>>,
    ops: Mutex<Vec<String>>,
    wait_visible_shares: Mutex<Vec<Duration>>,
    goto_count: Mutex<usize>,
    settle_count: Mutex<usize>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            goto_outcomes: Mutex::new(VecDeque::new()),
            titles: Mutex::new(VecDeque::new()),
            behaviors: Mutex::new(Vec::new()),
            ops: Mutex::new(Vec::new()),
            wait_visible_shares: Mutex::new(Vec::new()),
            goto_count: Mutex::new(0),
            settle_count: Mutex::new(0),
        }
    }

    /// Queues a navigation failure for the next `goto` call. Calls with
    /// nothing queued succeed.
    pub fn push_goto_error(&self, message: &str) {
        self.goto_outcomes
            .lock()
            .push_back(Err(message.to_string()));
    }

    pub fn push_goto_ok(&self) {
        self.goto_outcomes.lock().push_back(Ok(()));
    }

    /// Queues a title. Titles are consumed per `title()` call; the last
    /// one queued keeps repeating.
    pub fn push_title(&self, title: &str) {
        self.titles.lock().push_back(title.to_string());
    }

    pub fn on_query(&self, query: Query, behavior: QueryBehavior) {
        self.behaviors.lock().push((query, behavior));
    }

    fn behavior(&self, query: &Query) -> QueryBehavior {
        self.behaviors
            .lock()
            .iter()
            .find(|(known, _)| known == query)
            .map(|(_, behavior)| *behavior)
            .unwrap_or(QueryBehavior::Absent)
    }

    /// Every probe in call order, as `wait:<query>` / `first:<query>`.
    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().clone()
    }

    /// Timeout share passed to each `wait_visible` call.
    pub fn wait_visible_shares(&self) -> Vec<Duration> {
        self.wait_visible_shares.lock().clone()
    }

    pub fn goto_count(&self) -> usize {
        *self.goto_count.lock()
    }

    pub fn settle_count(&self) -> usize {
        *self.settle_count.lock()
    }
}

#[async_trait]
impl Page for FakePage {
    type Element = String;

    async fn goto(&self, _url: &str, _timeout: Duration) -> Result<(), DriverError> {
        *self.goto_count.lock() += 1;
        match self.goto_outcomes.lock().pop_front() {
            Some(Err(message)) => Err(DriverError::Navigation(message)),
            _ => Ok(()),
        }
    }

    async fn settle(&self, _timeout: Duration) -> Result<(), DriverError> {
        *self.settle_count.lock() += 1;
        Ok(())
    }

    async fn title(&self) -> Result<String, DriverError> {
        let mut titles = self.titles.lock();
        let title = if titles.len() > 1 {
            titles.pop_front().unwrap()
        } else {
            titles.front().cloned().unwrap_or_default()
        };
        Ok(title)
    }

    async fn wait_visible(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<String, DriverError> {
        self.ops.lock().push(format!("wait:{query}"));
        self.wait_visible_shares.lock().push(timeout);
        match self.behavior(query) {
            QueryBehavior::Visible(name) => Ok(name.to_string()),
            QueryBehavior::Hidden(_) | QueryBehavior::Absent => {
                Err(DriverError::Timeout(timeout))
            }
            QueryBehavior::Broken(message) => Err(DriverError::Backend(message.to_string())),
        }
    }

    async fn first(&self, query: &Query) -> Result<Option<String>, DriverError> {
        self.ops.lock().push(format!("first:{query}"));
        match self.behavior(query) {
            QueryBehavior::Visible(name) | QueryBehavior::Hidden(name) => {
                Ok(Some(name.to_string()))
            }
            QueryBehavior::Absent => Ok(None),
            QueryBehavior::Broken(message) => Err(DriverError::Backend(message.to_string())),
        }
    }
}
