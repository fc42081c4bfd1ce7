//! Trending command.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::facade::{Capabilities, Source};
use crate::provider::TrackRecord;

/// Default number of tracks printed.
pub const DEFAULT_LIMIT: usize = 10;

/// Prints the trending list as JSON.
#[derive(Parser)]
pub struct TrendingCommand {
    /// Number of tracks, 1 to 50.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Market code overriding the configured region.
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Serialize)]
struct TrendingOutput<'a> {
    source: Source,
    region: &'a str,
    tracks: Vec<TrackRecord>,
}

impl TrendingCommand {
    /// Executes the trending command.
    pub async fn execute(self, capabilities: &Capabilities) -> Result<()> {
        let region = self
            .region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .unwrap_or_else(|| capabilities.region());

        let (tracks, source) = capabilities
            .fetch_trending(self.limit, Some(region))
            .await
            .into_parts()?;

        let output = TrendingOutput {
            source,
            region,
            tracks,
        };
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialize trending list")?;
        println!("{json}");
        Ok(())
    }
}
