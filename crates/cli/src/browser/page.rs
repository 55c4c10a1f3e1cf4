//! chromiumoxide-backed implementation of the core page seam.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page as CdpPage;
use tokio::time::{sleep, timeout};
use tracing::debug;

use holdfast::page::Page;
use holdfast::{DriverError, Query};

/// Quiet period that stands in for a network-idle signal.
const QUIET_DELAY: Duration = Duration::from_secs(1);
/// Poll cadence for the visibility wait.
const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Probe evaluated on a candidate element to decide visibility.
const VISIBILITY_PROBE: &str = r#"function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}"#;

pub struct ChromePage {
    page: CdpPage,
}

impl ChromePage {
    pub fn new(page: CdpPage) -> Self {
        Self { page }
    }

    async fn all_matches(&self, query: &Query) -> Result<Vec<Element>, DriverError> {
        let found = match query {
            Query::Css(css) => self.page.find_elements(css.as_str()).await,
            Query::XPath(xpath) => self.page.find_xpaths(xpath.as_str()).await,
        };
        match found {
            Ok(elements) => Ok(elements),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(err) => Err(DriverError::Backend(err.to_string())),
        }
    }

    /// First visible node among all matches, in document order.
    async fn first_visible(&self, query: &Query) -> Result<Option<Element>, DriverError> {
        for element in self.all_matches(query).await? {
            if self.visible(&element).await? {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn visible(&self, element: &Element) -> Result<bool, DriverError> {
        let evaluation = element
            .call_js_fn(VISIBILITY_PROBE, false)
            .await
            .map_err(|e| DriverError::Backend(e.to_string()))?;
        Ok(evaluation
            .result
            .value
            .as_ref()
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }
}

#[async_trait]
impl Page for ChromePage {
    type Element = Element;

    async fn goto(&self, url: &str, limit: Duration) -> Result<(), DriverError> {
        let navigation = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| DriverError::Navigation(e.to_string()))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| DriverError::Navigation(e.to_string()))?;
            Ok::<_, DriverError>(())
        };
        match timeout(limit, navigation).await {
            Ok(result) => result?,
            Err(_) => return Err(DriverError::Timeout(limit)),
        }
        // There is no network-idle event over CDP here; a bounded quiet
        // period stands in for it.
        sleep(QUIET_DELAY.min(limit)).await;
        Ok(())
    }

    async fn settle(&self, limit: Duration) -> Result<(), DriverError> {
        match timeout(limit, self.page.wait_for_navigation()).await {
            Ok(result) => {
                if let Err(err) = result {
                    debug!(target = "holdfast", error = %err, "settle wait reported an error");
                }
                sleep(QUIET_DELAY.min(limit)).await;
                Ok(())
            }
            Err(_) => Err(DriverError::Timeout(limit)),
        }
    }

    async fn title(&self) -> Result<String, DriverError> {
        self.page
            .get_title()
            .await
            .map(|title| title.unwrap_or_default())
            .map_err(|e| DriverError::Backend(e.to_string()))
    }

    async fn wait_visible(
        &self,
        query: &Query,
        limit: Duration,
    ) -> Result<Element, DriverError> {
        let started = Instant::now();
        loop {
            if let Some(element) = self.first_visible(query).await? {
                return Ok(element);
            }
            if started.elapsed() >= limit {
                return Err(DriverError::Timeout(limit));
            }
            sleep(VISIBILITY_POLL_INTERVAL).await;
        }
    }

    async fn first(&self, query: &Query) -> Result<Option<Element>, DriverError> {
        Ok(self.all_matches(query).await?.into_iter().next())
    }
}
