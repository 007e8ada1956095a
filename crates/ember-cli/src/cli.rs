use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Pocket mood journal that syncs when it can")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Base URL of the remote journal store
    #[arg(long, global = true, value_name = "URL")]
    pub remote_url: Option<String>,

    /// Optional path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a mood entry
    #[command(alias = "new")]
    Add {
        /// Mood score, 1 (awful) through 5 (great)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: u8,
        /// Optional note text
        note: Vec<String>,
        /// Optional reference to an attached image
        #[arg(long, value_name = "REF")]
        image: Option<String>,
        /// Entry timestamp as RFC 3339 (defaults to now)
        #[arg(long, value_name = "WHEN")]
        at: Option<String>,
    },
    /// List recent entries, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing entry
    Edit {
        /// Entry ID or unique ID prefix
        id: String,
        /// New mood score
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        mood: Option<u8>,
        /// Replacement note text (empty clears it)
        #[arg(long, value_name = "TEXT")]
        note: Option<String>,
        /// Replacement image reference
        #[arg(long, value_name = "REF")]
        image: Option<String>,
    },
    /// Delete an entry (propagates on the next sync)
    Delete {
        /// Entry ID or unique ID prefix
        id: String,
    },
    /// Reconcile with the remote store
    Sync {
        /// Only push local changes
        #[arg(long, conflicts_with = "pull_only")]
        push_only: bool,
        /// Only pull remote changes
        #[arg(long)]
        pull_only: bool,
    },
    /// Store a session so entries can sync
    Login {
        /// User identifier
        #[arg(long, value_name = "ID")]
        user_id: String,
        /// Bearer token for the remote store
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Token expiry as Unix seconds
        #[arg(long, value_name = "UNIX_SECS")]
        expires_at: Option<i64>,
    },
    /// Forget the stored session
    Logout,
    /// Show or edit the user profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile, refreshing from the remote store when reachable
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update profile fields
    Set {
        /// Display name
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// Contact email
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
        /// Avatar reference
        #[arg(long, value_name = "REF")]
        avatar: Option<String>,
    },
}
