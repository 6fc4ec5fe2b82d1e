use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feedgrep")]
#[command(about = "RSS aggregator with boolean keyword search and push notifications")]
#[command(version)]
pub struct Cli {
    /// Path to the YAML configuration file (default: feedgrep.yaml,
    /// overridable via FEEDGREP_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest feeds on the configured interval and push new items
    Run {
        /// Run a single ingestion cycle and exit
        #[arg(long)]
        once: bool,

        /// Render pushes to stdout instead of delivering them
        #[arg(long)]
        dry_run: bool,
    },

    /// Search stored entries with the keyword grammar (+required -excluded optional)
    Search {
        /// Keyword expression
        keyword: String,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by source name
        #[arg(long)]
        source: Option<String>,

        /// Maximum entries to return (clamped to 1000)
        #[arg(long, default_value_t = 50)]
        limit: u32,

        /// Entries to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// List recent entries, newest first
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by source name
        #[arg(long)]
        source: Option<String>,

        /// Maximum entries to return (clamped to 1000)
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Entries to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}
