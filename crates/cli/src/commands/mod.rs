mod find;
mod load;
mod ready;

use crate::cli::{Cli, Commands};
use crate::error::Result;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Load { url, attempts, expect, report } => {
            load::execute(&url, attempts, expect, report.as_deref(), cli.headful).await
        }
        Commands::Find { url, description, selectors, timeout_ms } => {
            find::execute(&url, &description, &selectors, timeout_ms, cli.headful).await
        }
        Commands::Ready { url } => ready::execute(&url, cli.headful).await,
    }
}
