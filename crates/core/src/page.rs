//! The seam to the browser-automation backend.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverError;
use crate::selector::Query;

/// The surface the resilience layer needs from an automation backend.
///
/// One handle per logical test. Implementations decide what a settled
/// network looks like; the layer only supplies the bound.
#[async_trait]
pub trait Page: Send + Sync {
    /// Backend-specific element handle returned by successful resolution.
    type Element: Send;

    /// Navigates to `url` and waits for the backend's network-idle signal,
    /// bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits for in-flight network activity to settle, bounded by `timeout`.
    async fn settle(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Current document title. Empty when the document has none.
    async fn title(&self) -> Result<String, DriverError>;

    /// Waits until a node matching `query` is visible and returns it.
    ///
    /// When several nodes match, the backend picks the first visible one.
    async fn wait_visible(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<Self::Element, DriverError>;

    /// First node matching `query`, visible or not. Does not wait.
    async fn first(&self, query: &Query) -> Result<Option<Self::Element>, DriverError>;
}
