mod page;

pub use page::ChromePage;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{CliError, Result};

/// A launched browser, the handler task that pumps its CDP events, and
/// one open page.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: ChromePage,
}

impl BrowserSession {
    /// Launches a browser and opens one blank page.
    pub async fn launch(headful: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if headful {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(CliError::BrowserLaunch)?;

        debug!(target = "holdfast", headful, "launching browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CliError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CliError::BrowserLaunch(e.to_string()))?;

        Ok(Self {
            browser,
            handler,
            page: ChromePage::new(page),
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| CliError::BrowserLaunch(e.to_string()))?;
        self.handler.abort();
        Ok(())
    }
}
