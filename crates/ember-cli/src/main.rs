//! Ember CLI - log moods from the terminal, sync when a network shows up.

mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, ProfileCommands};
use crate::commands::{
    run_add, run_delete, run_edit, run_list, run_login, run_logout, run_profile_set,
    run_profile_show, run_sync, AppContext,
};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = AppContext::open(&cli).await?;

    match cli.command {
        Commands::Add {
            mood,
            note,
            image,
            at,
        } => run_add(&ctx, mood, &note, image, at.as_deref()).await,
        Commands::List { limit, json } => run_list(&ctx, limit, json).await,
        Commands::Edit {
            id,
            mood,
            note,
            image,
        } => run_edit(&ctx, &id, mood, note, image).await,
        Commands::Delete { id } => run_delete(&ctx, &id).await,
        Commands::Sync {
            push_only,
            pull_only,
        } => run_sync(&ctx, push_only, pull_only).await,
        Commands::Login {
            user_id,
            token,
            expires_at,
        } => run_login(&ctx, user_id, token, expires_at),
        Commands::Logout => run_logout(&ctx),
        Commands::Profile { command } => match command {
            ProfileCommands::Show { json } => run_profile_show(&ctx, json).await,
            ProfileCommands::Set {
                name,
                email,
                avatar,
            } => run_profile_set(&ctx, name, email, avatar).await,
        },
    }
}
