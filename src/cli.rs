//! CLI interface for music-chat.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::facade::Capabilities;
use crate::utils::settings::ChatSettings;

pub mod chat;
pub mod status;
pub mod trending;

/// music-chat: Ask about trending songs, artists and lyrics.
#[derive(Parser)]
#[command(name = "music-chat")]
#[command(about = "A music chatbot over live providers with a synthetic fallback", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Skips every provider and answers from the synthetic corpus.
    #[arg(long, global = true)]
    pub offline: bool,

    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat session.
    Chat(chat::ChatCommand),
    /// Answers a single utterance.
    Ask(chat::AskCommand),
    /// Shows provider credential and connection state.
    Status(status::StatusCommand),
    /// Prints the trending list as JSON.
    Trending(trending::TrendingCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        let settings = ChatSettings::load().context("Failed to load settings")?;
        let capabilities = build_capabilities(&settings, self.offline)?;

        match self.command {
            Commands::Chat(cmd) => cmd.execute(capabilities).await,
            Commands::Ask(cmd) => cmd.execute(capabilities).await,
            Commands::Status(cmd) => cmd.execute(&settings, &capabilities).await,
            Commands::Trending(cmd) => cmd.execute(&capabilities).await,
        }
    }
}

fn build_capabilities(settings: &ChatSettings, offline: bool) -> Result<Capabilities> {
    if offline {
        Capabilities::offline(settings.region.clone())
    } else {
        Capabilities::from_settings(settings)
    }
}
