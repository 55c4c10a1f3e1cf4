use std::path::Path;

use colored::Colorize;
use holdfast::{Journal, LoadConfig, LoadOutcome, PageLoader, SuiteReport};
use tracing::info;

use crate::browser::BrowserSession;
use crate::error::Result;

pub async fn execute(
    url: &str,
    attempts: u32,
    expect: Vec<String>,
    report: Option<&Path>,
    headful: bool,
) -> Result<()> {
    info!(target = "holdfast", %url, attempts, "load");

    let mut config = LoadConfig::default().with_max_attempts(attempts);
    for marker in expect {
        config = config.with_identity_marker(marker);
    }

    let session = BrowserSession::launch(headful).await?;
    let journal = Journal::new(format!("load {url}"));
    journal.step("navigate");

    let loader = PageLoader::new(config);
    let outcome = loader.load(session.page(), url).await;

    match &outcome {
        LoadOutcome::Succeeded { title, attempts } => {
            journal.success(format!("loaded \"{title}\" in {attempts} attempt(s)"));
            println!(
                "{} {url} — \"{title}\" ({attempts} attempt(s))",
                "loaded".green()
            );
        }
        LoadOutcome::Exhausted { attempts } => {
            journal.error(format!("exhausted {attempts} attempt(s)"));
            println!(
                "{} {url} after {attempts} attempt(s); proceeding is best-effort",
                "exhausted".red()
            );
        }
    }

    if let Some(path) = report {
        let mut suite = SuiteReport::new();
        suite.add(journal.summary());
        suite.save_json(path)?;
        println!("report saved to {}", path.display());
    }

    session.close().await
}
