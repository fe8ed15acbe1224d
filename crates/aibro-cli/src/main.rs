use std::path::PathBuf;

use aibro_core::catalog::Category;
use aibro_infrastructure::{AibroPaths, AppConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod logging;
mod render;

use context::AppContext;

#[derive(Parser)]
#[command(name = "aibro")]
#[command(about = "AI Bro - policy fund recommendations for small-business owners", long_about = None)]
struct Cli {
    /// Data directory (defaults to AIBRO_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/aibro/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the business profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show or edit settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Browse the announcement catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Saved announcements
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
    /// Recommendation chat sessions
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Interactive recommendation chat (default)
    Repl,
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum ProfileAction {
    Show,
    Set {
        #[arg(long)]
        region: String,
        #[arg(long)]
        industry: String,
        #[arg(long, default_value_t = 1)]
        employees: u32,
        /// Opening date, YYYY-MM-DD
        #[arg(long)]
        opening_date: String,
        #[arg(long, default_value = "0")]
        revenue: String,
    },
    /// List accepted regions and industries
    Options,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    Set {
        /// Start new chats with the stored profile without asking
        #[arg(long, action = clap::ArgAction::Set)]
        reuse_profile: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List announcements matching the filters
    List {
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one announcement
    Show { policy_id: String },
    /// Announcements whose deadline is near
    EndingSoon {
        /// Reference date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<chrono::NaiveDate>,
        #[arg(long, default_value_t = aibro_application::browse_service::ENDING_SOON_WINDOW_DAYS)]
        days: u64,
        #[arg(long, default_value_t = aibro_application::browse_service::ENDING_SOON_LIMIT)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum SavedAction {
    List,
    /// Save an announcement, or unsave it if already saved
    Toggle { policy_id: String },
}

#[derive(Subcommand)]
pub enum ChatAction {
    /// Start a new session
    New,
    /// List sessions, most recent first
    List,
    /// Print a session transcript
    Show { session_id: String },
    /// Send a message to a session and print the reply
    Send {
        #[arg(long)]
        session: String,
        text: String,
    },
    /// Delete a session
    Delete { session_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    let _log_guard = logging::init(&config.logging.level, &logs_dir(cli.data_dir.as_ref())?)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "aibro starting");

    let ctx = AppContext::load(config, cli.data_dir)?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Profile { action } => commands::profile::run(&ctx, action).await?,
        Commands::Settings { action } => commands::settings::run(&ctx, action).await?,
        Commands::Catalog { action } => commands::catalog::run(&ctx, action).await?,
        Commands::Saved { action } => commands::saved::run(&ctx, action).await?,
        Commands::Chat { action } => commands::chat::run(&ctx, action).await?,
        Commands::Repl => commands::repl::run(&ctx).await?,
        Commands::Config => print!("{}", ctx.config.to_toml()?),
    }

    Ok(())
}

fn logs_dir(data_dir: Option<&PathBuf>) -> Result<PathBuf> {
    Ok(match data_dir {
        Some(dir) => dir.join("logs"),
        None => AibroPaths::logs_dir()?,
    })
}
