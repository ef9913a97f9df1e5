use std::fs;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use pagefeed::cli::{Cli, Commands};
use pagefeed::config::Config;
use pagefeed::discovery::FeedDiscovery;
use pagefeed::domain::{BulkOutcome, FeedDraft, FeedStatus, FeedUpdate, RefreshReport};
use pagefeed::errors::PagefeedError;
use pagefeed::fetch::PageFetcher;
use pagefeed::rss::RssStore;
use pagefeed::services::{FeedService, ImportExportService, RefreshService};
use pagefeed::storage::{JsonFeedStore, JsonStorage};

/// On-disk shape of an `add-bulk` input file.
#[derive(Deserialize)]
struct BulkFile {
    #[serde(default)]
    feeds: Vec<FeedDraft>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env();
    config.ensure_dirs().context("preparing data directories")?;

    let store = JsonFeedStore::new(JsonStorage::new(config.store_path()));
    let rss = RssStore::new(config.feeds_dir(), &config.public_url);

    match cli.command {
        Commands::Add {
            name,
            url,
            selector,
            description,
        } => cmd_add(store, rss, name, url, selector, description),
        Commands::AddBulk { path } => cmd_add_bulk(store, rss, &path),
        Commands::List => cmd_list(store, rss),
        Commands::Show { name } => cmd_show(store, rss, &name),
        Commands::Update {
            name,
            new_name,
            url,
            selector,
            description,
        } => cmd_update(store, rss, &name, new_name, url, selector, description),
        Commands::Remove { names } => cmd_remove(store, rss, &names),
        Commands::Refresh { names, all } => cmd_refresh(store, rss, &config, &names, all),
        Commands::Preview { url, selector } => cmd_preview(store, rss, &config, &url, selector),
        Commands::Discover { url } => cmd_discover(&config, &url),
        Commands::Import { path } => cmd_import(store, &config, &path),
        Commands::Export { output } => cmd_export(store, &config, output),
        Commands::Backup { output } => cmd_backup(store, rss, output),
        Commands::Restore { path } => cmd_restore(store, rss, &path),
        Commands::Status => cmd_status(store, rss),
    }
}

fn cmd_add(
    store: JsonFeedStore,
    rss: RssStore,
    name: String,
    url: String,
    selector: Option<String>,
    description: Option<String>,
) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);

    let mut draft = FeedDraft::new(name, url);
    if let Some(selector) = selector {
        draft = draft.with_selector(selector);
    }
    if let Some(description) = description {
        draft = draft.with_description(description);
    }

    let feed = service.add(draft)?;
    println!("Feed added: {}", feed.name);
    println!("  URL: {}", feed.url);
    if !feed.css_selector.is_empty() {
        println!("  Selector: {}", feed.css_selector);
    }
    Ok(())
}

fn cmd_add_bulk(store: JsonFeedStore, rss: RssStore, path: &str) -> anyhow::Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let file: BulkFile =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path))?;

    let service = FeedService::new(store, rss);

    println!("Adding {} feeds from {}...\n", file.feeds.len(), path);
    let outcome = service.add_bulk(file.feeds)?;
    print_bulk_outcome(&outcome);
    Ok(())
}

fn cmd_list(store: JsonFeedStore, rss: RssStore) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);
    let feeds = service.list()?;

    if feeds.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    println!("Configured feeds:\n");
    for feed in feeds {
        let status = feed
            .last_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "never refreshed".to_string());
        println!("  {} [{}]", feed.name, status);
        println!("    URL: {}", feed.url);
        if !feed.css_selector.is_empty() {
            println!("    Selector: {}", feed.css_selector);
        }
        if let Some(updated) = &feed.last_update {
            println!("    Articles: {}, last update: {}", feed.article_count, updated);
        }
        println!();
    }

    Ok(())
}

fn cmd_show(store: JsonFeedStore, rss: RssStore, name: &str) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);
    let feed = service.get(name)?;

    println!("{}", feed.name);
    println!("  URL: {}", feed.url);
    if !feed.css_selector.is_empty() {
        println!("  Selector: {}", feed.css_selector);
    }
    if !feed.description.is_empty() {
        println!("  Description: {}", feed.description);
    }
    println!("  Created: {}", feed.created);
    match feed.last_status {
        Some(status) => {
            println!("  Status: {}", status);
            if let Some(updated) = &feed.last_update {
                println!("  Last update: {}", updated);
            }
            if let Some(error) = &feed.last_error {
                println!("  Error: {}", error);
            }
            println!("  Articles: {}", feed.article_count);
        }
        None => println!("  Status: never refreshed"),
    }

    Ok(())
}

fn cmd_update(
    store: JsonFeedStore,
    rss: RssStore,
    name: &str,
    new_name: Option<String>,
    url: Option<String>,
    selector: Option<String>,
    description: Option<String>,
) -> anyhow::Result<()> {
    if new_name.is_none() && url.is_none() && selector.is_none() && description.is_none() {
        return Err(PagefeedError::InvalidInput(
            "nothing to update; pass at least one of --new-name, --url, --selector, --description"
                .to_string(),
        )
        .into());
    }

    let service = FeedService::new(store, rss);
    let changes = FeedUpdate {
        new_name,
        url,
        css_selector: selector,
        description,
    };

    let feed = service.update(name, changes)?;
    println!("Feed updated: {}", feed.name);
    println!("  URL: {}", feed.url);
    Ok(())
}

fn cmd_remove(store: JsonFeedStore, rss: RssStore, names: &[String]) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);

    // A single unknown name is an error; in a batch each name just reports.
    if names.len() == 1 {
        let name = &names[0];
        if !service.remove(name)? {
            return Err(PagefeedError::FeedNotFound(name.clone()).into());
        }
        println!("Removed: {}", name);
        return Ok(());
    }

    let mut removed = 0;
    for (name, was_removed) in service.remove_many(names)? {
        if was_removed {
            removed += 1;
            println!("  Removed: {}", name);
        } else {
            println!("  Not found: {}", name);
        }
    }
    println!("\n{}/{} feeds removed", removed, names.len());
    Ok(())
}

fn cmd_refresh(
    store: JsonFeedStore,
    rss: RssStore,
    config: &Config,
    names: &[String],
    all: bool,
) -> anyhow::Result<()> {
    if !all && names.is_empty() {
        return Err(
            PagefeedError::InvalidInput("pass feed names or --all".to_string()).into(),
        );
    }

    let fetcher = PageFetcher::new(config);
    let service = RefreshService::new(store, fetcher, rss, config.refresh_delay);

    if all {
        let reports = service.refresh_all()?;
        if reports.is_empty() {
            println!("No feeds configured.");
            return Ok(());
        }
        print_reports(&reports);
        return Ok(());
    }

    if names.len() == 1 {
        let feed = service.refresh_one(&names[0])?;
        match feed.last_status {
            Some(FeedStatus::Success) => {
                println!("{}: success ({} articles)", feed.name, feed.article_count)
            }
            _ => println!(
                "{}: error: {}",
                feed.name,
                feed.last_error.as_deref().unwrap_or("unknown")
            ),
        }
        return Ok(());
    }

    print_reports(&service.refresh_many(names));
    Ok(())
}

fn cmd_preview(
    store: JsonFeedStore,
    rss: RssStore,
    config: &Config,
    url: &str,
    selector: Option<String>,
) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(config);
    let service = RefreshService::new(store, fetcher, rss, config.refresh_delay);

    let articles = service.preview(url, selector.as_deref().unwrap_or(""))?;
    println!("{} articles extracted from {}\n", articles.len(), url);

    for article in articles.iter().take(10) {
        println!("  {}", article.title);
        println!("    {}", article.url);
        if let Some(date) = &article.date_published {
            println!("    {}", date);
        }
    }
    if articles.len() > 10 {
        println!("  ... and {} more", articles.len() - 10);
    }

    Ok(())
}

fn cmd_discover(config: &Config, url: &str) -> anyhow::Result<()> {
    let discovery = FeedDiscovery::new(config);
    let candidates = discovery.discover(url);

    println!("Found {} candidates for {}:\n", candidates.len(), url);
    for candidate in &candidates {
        println!(
            "  [{}/{}] {}",
            candidate.kind.as_str(),
            candidate.source.as_str(),
            candidate.url
        );
        println!("    {}", candidate.title);
    }

    Ok(())
}

fn cmd_import(store: JsonFeedStore, config: &Config, path: &str) -> anyhow::Result<()> {
    // Lossy read on purpose; import tolerates malformed OPML.
    let bytes = fs::read(path).with_context(|| format!("reading {}", path))?;
    let content = String::from_utf8_lossy(&bytes);

    let service = ImportExportService::new(store, &config.public_url);

    println!("Importing feeds from {}...\n", path);
    let outcome = service.import(&content)?;
    print_bulk_outcome(&outcome);
    Ok(())
}

fn cmd_export(store: JsonFeedStore, config: &Config, output: Option<String>) -> anyhow::Result<()> {
    let service = ImportExportService::new(store, &config.public_url);
    let opml = service.export()?;

    match output {
        Some(path) => {
            fs::write(&path, &opml).with_context(|| format!("writing {}", path))?;
            println!("Exported feeds to {}", path);
        }
        None => println!("{}", opml),
    }

    Ok(())
}

fn cmd_backup(store: JsonFeedStore, rss: RssStore, output: Option<String>) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);
    let backup = service.backup()?;

    match output {
        Some(path) => {
            fs::write(&path, &backup).with_context(|| format!("writing {}", path))?;
            println!("Backup written to {}", path);
        }
        None => println!("{}", backup),
    }

    Ok(())
}

fn cmd_restore(store: JsonFeedStore, rss: RssStore, path: &str) -> anyhow::Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let service = FeedService::new(store, rss);

    let count = service.restore(&content)?;
    println!("Restored {} feeds", count);
    Ok(())
}

fn cmd_status(store: JsonFeedStore, rss: RssStore) -> anyhow::Result<()> {
    let service = FeedService::new(store, rss);
    let summary = service.status_summary()?;

    println!("Feeds: {}", summary.total);
    println!("  success: {}", summary.success);
    println!("  error: {}", summary.error);
    match summary.last_update {
        Some(stamp) => println!("  last update: {}", stamp),
        None => println!("  last update: never"),
    }

    Ok(())
}

fn print_bulk_outcome(outcome: &BulkOutcome) {
    for feed in &outcome.created {
        println!("  + {}", feed.name);
    }
    for skip in &outcome.skipped_details {
        println!("  - {} ({})", skip.name, skip.reason);
    }
    for failed in &outcome.error_details {
        println!("  ! {}: {}", failed.name, failed.error);
    }

    println!(
        "\n{} added, {} skipped, {} failed",
        outcome.created_count(),
        outcome.skipped,
        outcome.errors
    );
}

fn print_reports(reports: &[RefreshReport]) {
    let mut succeeded = 0;
    for report in reports {
        match report.status {
            FeedStatus::Success => {
                succeeded += 1;
                println!("  {}: success ({} articles)", report.name, report.article_count);
            }
            FeedStatus::Error => println!(
                "  {}: error: {}",
                report.name,
                report.error.as_deref().unwrap_or("unknown")
            ),
        }
    }
    println!("\n{}/{} feeds refreshed", succeeded, reports.len());
}
