use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "holdfast")]
#[command(about = "Probe flaky pages with retrying loads and fallback selectors")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Run the browser with a visible window
    #[arg(long, global = true)]
    pub headful: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a URL, riding out bot-challenge interstitials
    Load {
        url: String,

        /// Attempts before giving up
        #[arg(long, default_value = "3")]
        attempts: u32,

        /// Title substring that identifies the expected site (repeatable)
        #[arg(long = "expect", value_name = "MARKER")]
        expect: Vec<String>,

        /// Write a JSON run report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
    },

    /// Resolve an element by trying selector strategies in order
    Find {
        url: String,

        /// Human description of the element being looked for
        description: String,

        /// Strategy in tagged form: role:NAME, text:LITERAL,
        /// placeholder:LITERAL, or a raw query (repeatable, tried in order)
        #[arg(long = "selector", short = 's', value_name = "STRATEGY", required = true)]
        selectors: Vec<String>,

        /// Total budget shared across strategies (ms)
        #[arg(long, default_value = "15000")]
        timeout_ms: u64,
    },

    /// Wait until a page looks fully interactive
    Ready { url: String },
}
