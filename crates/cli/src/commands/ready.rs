use std::time::Duration;

use colored::Colorize;
use holdfast::page::Page as _;
use holdfast::{LoadConfig, PageLoader};
use tracing::info;

use crate::browser::BrowserSession;
use crate::error::{CliError, Result};

const NAV_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn execute(url: &str, headful: bool) -> Result<()> {
    info!(target = "holdfast", %url, "ready");

    let session = BrowserSession::launch(headful).await?;
    let page = session.page();
    page.goto(url, NAV_TIMEOUT)
        .await
        .map_err(|e| CliError::Navigation {
            url: url.to_string(),
            source: anyhow::Error::new(e),
        })?;

    let loader = PageLoader::new(LoadConfig::default());
    loader.wait_ready(page).await.map_err(CliError::Resolve)?;

    println!("{} {url}", "ready".green());
    session.close().await
}
