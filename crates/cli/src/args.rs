//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// devpulse: aggregate, rank, and track developer news from the terminal
#[derive(Parser, Debug)]
#[command(name = "devpulse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and merge articles from all enabled sources
    Fetch(FetchArgs),

    /// Rank unread articles against your reading history
    Recommend(RecommendArgs),

    /// Find articles similar to one you liked
    Similar(SimilarArgs),

    /// Show trending topics across the current stream
    Trending(TrendingArgs),

    /// Record read/bookmark state for an article
    Mark(MarkArgs),

    /// Manage article collections
    Collections(CollectionsArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Only articles from this source (e.g. devto, hackernews, nvd)
    #[arg(long)]
    pub source: Option<String>,

    /// Only articles in this category (e.g. Security, "Web Dev")
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive substring search over title/description/tags
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum number of articles to show
    #[arg(long, default_value_t = 50)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Maximum number of recommendations
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SimilarArgs {
    /// Reference article id (as shown by fetch)
    pub article_id: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TrendingArgs {
    /// Maximum number of topics
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    #[command(subcommand)]
    pub command: MarkCommands,
}

#[derive(Subcommand, Debug)]
pub enum MarkCommands {
    /// Record an article as read
    Read {
        /// Article id
        article_id: String,

        /// Article url, stored with the history entry
        #[arg(long, default_value = "")]
        url: String,
    },

    /// Bookmark an article
    Bookmark {
        /// Article id
        article_id: String,
    },

    /// Remove a bookmark
    Unbookmark {
        /// Article id
        article_id: String,
    },
}

#[derive(Args, Debug)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    pub command: CollectionsCommands,
}

#[derive(Subcommand, Debug)]
pub enum CollectionsCommands {
    /// List all collections
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new collection
    Create {
        /// Collection name
        name: String,

        /// Optional description
        #[arg(long, default_value = "")]
        description: String,

        /// Display color (hex)
        #[arg(long, default_value = "#3b82f6")]
        color: String,
    },

    /// Delete a collection
    Delete {
        /// Collection id
        id: String,
    },

    /// Add an article to a collection
    Add {
        /// Collection id
        id: String,

        /// Article id
        article_id: String,
    },

    /// Remove an article from a collection
    Remove {
        /// Collection id
        id: String,

        /// Article id
        article_id: String,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
