use std::time::Duration;

use colored::Colorize;
use holdfast::page::Page as _;
use holdfast::{ElementResolver, SelectorStrategy};
use tracing::info;

use crate::browser::BrowserSession;
use crate::error::{CliError, Result};

const NAV_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn execute(
    url: &str,
    description: &str,
    selectors: &[String],
    timeout_ms: u64,
    headful: bool,
) -> Result<()> {
    info!(
        target = "holdfast",
        %url,
        %description,
        strategies = selectors.len(),
        "find"
    );

    let strategies: Vec<SelectorStrategy> = selectors
        .iter()
        .map(|tag| SelectorStrategy::parse(tag))
        .collect();

    let session = BrowserSession::launch(headful).await?;
    let page = session.page();
    page.goto(url, NAV_TIMEOUT)
        .await
        .map_err(|e| CliError::Navigation {
            url: url.to_string(),
            source: anyhow::Error::new(e),
        })?;

    let resolver = ElementResolver::new();
    let budget = Duration::from_millis(timeout_ms);
    match resolver.find(page, &strategies, description, budget).await {
        Ok(element) => {
            let text = element.inner_text().await.ok().flatten().unwrap_or_default();
            let text = text.trim();
            if text.is_empty() {
                println!("{} {description}", "found".green());
            } else {
                println!("{} {description}: {}", "found".green(), snippet(text, 100));
            }
        }
        Err(err) => {
            println!("{} {err}", "not found".red());
            session.close().await?;
            return Err(err.into());
        }
    }

    session.close().await
}

fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}
