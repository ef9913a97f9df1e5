use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pagefeed")]
#[command(about = "Generates RSS feeds for web pages that have none")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new feed for a web page
    Add {
        /// Feed name, also the filename stem of the RSS artifact
        name: String,
        /// URL of the page to scrape
        url: String,
        /// CSS selector for article elements (heuristics when omitted)
        #[arg(short, long)]
        selector: Option<String>,
        /// Free-text description, doubles as the OPML category
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add many feeds from a JSON file with a top-level "feeds" array
    AddBulk {
        /// Path to the JSON file
        path: String,
    },

    /// List all configured feeds
    List,

    /// Show one feed with its refresh status
    Show {
        /// Feed name
        name: String,
    },

    /// Change a feed's name, URL, selector or description
    Update {
        /// Current feed name
        name: String,
        /// New feed name (also renames the RSS artifact)
        #[arg(long)]
        new_name: Option<String>,
        /// New page URL
        #[arg(long)]
        url: Option<String>,
        /// New CSS selector (empty string returns to heuristics)
        #[arg(short, long)]
        selector: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Remove feeds and their RSS artifacts
    Remove {
        /// Feed names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Fetch pages and rebuild RSS artifacts
    Refresh {
        /// Feed names to refresh
        names: Vec<String>,
        /// Refresh every configured feed
        #[arg(long, conflicts_with = "names")]
        all: bool,
    },

    /// Extract articles from a page without storing anything
    Preview {
        /// URL of the page
        url: String,
        /// CSS selector for article elements
        #[arg(short, long)]
        selector: Option<String>,
    },

    /// Look for existing RSS/Atom feeds on a page
    Discover {
        /// URL of the page (scheme optional)
        url: String,
    },

    /// Import feeds from an OPML file
    Import {
        /// Path to the OPML file
        path: String,
    },

    /// Export all feeds as OPML
    Export {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Write a restorable JSON backup of all feed definitions
    Backup {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace all feed definitions with those from a backup file
    Restore {
        /// Path to the backup JSON file
        path: String,
    },

    /// Summarize refresh health across all feeds
    Status,
}
