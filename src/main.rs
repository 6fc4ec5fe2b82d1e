use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use feedgrep::cli::{Cli, Commands};
use feedgrep::config::Config;
use feedgrep::domain::Entry;
use feedgrep::errors::FeedgrepResult;
use feedgrep::query::KeywordQuery;
use feedgrep::scheduler::Scheduler;
use feedgrep::services::{IngestService, PushService};
use feedgrep::sources::HttpFeedFetcher;
use feedgrep::storage::sqlite::{SqliteEntryRepository, SqliteStorage};
use feedgrep::storage::{EntryQuery, EntryRepository};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> FeedgrepResult<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let storage = SqliteStorage::new(&config.db_path)?;
    let repository = Arc::new(SqliteEntryRepository::new(storage));

    match cli.command {
        Commands::Run { once, dry_run } => cmd_run(&config, repository, once, dry_run),
        Commands::Search {
            keyword,
            category,
            source,
            limit,
            offset,
        } => cmd_search(repository, Some(&keyword), category, source, limit, offset),
        Commands::List {
            category,
            source,
            limit,
            offset,
        } => cmd_search(repository, None, category, source, limit, offset),
    }
}

fn cmd_run(
    config: &Config,
    repository: Arc<SqliteEntryRepository>,
    once: bool,
    dry_run: bool,
) -> FeedgrepResult<()> {
    let push = PushService::from_settings(&config.push)?.with_dry_run(dry_run);
    let ingest = IngestService::new(repository.clone(), HttpFeedFetcher::new());
    let interval = Duration::from_secs(config.interval_minutes * 60);

    let scheduler = Scheduler::new(
        ingest,
        repository,
        push,
        config.sources(),
        config.rules(),
        interval,
        config.push.dedupe_rule_pushes,
    );

    if once {
        let report = scheduler.run_cycle_once();
        println!(
            "Cycle complete: {} new items, {} failures.",
            report.total_new(),
            report.total_failures()
        );
        return Ok(());
    }

    tracing::info!(
        interval_minutes = config.interval_minutes,
        sources = config.sources().len(),
        rules = config.rules().len(),
        "scheduler starting"
    );

    // Runs until the process is terminated; the loop itself stops cleanly
    // between ticks when its control channel closes.
    let (_shutdown_tx, shutdown_rx) = std::sync::mpsc::channel();
    scheduler.run(&shutdown_rx);
    Ok(())
}

fn cmd_search(
    repository: Arc<SqliteEntryRepository>,
    keyword: Option<&str>,
    category: Option<String>,
    source: Option<String>,
    limit: u32,
    offset: u32,
) -> FeedgrepResult<()> {
    let mut query = EntryQuery::default().with_limit(limit).with_offset(offset);

    if let Some(keyword) = keyword {
        query = query.with_keyword(KeywordQuery::parse(keyword));
    }
    if let Some(category) = category {
        query = query.with_category(&category);
    }
    if let Some(source) = source {
        query = query.with_source(&source);
    }

    let entries = repository.search(&query)?;

    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }

    for entry in &entries {
        print_entry(entry);
    }
    println!("{} entries.", entries.len());

    Ok(())
}

fn print_entry(entry: &Entry) {
    println!("[{} / {}] {}", entry.category, entry.source_name, entry.title);
    println!("    {}", entry.link);
    if !entry.published_at.is_empty() {
        println!("    published: {}", entry.published_at);
    }
    println!("    ingested:  {}", entry.ingested_at);
}
