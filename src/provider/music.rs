//! Music catalog records and client trait.

pub mod spotify;

use serde::{Deserialize, Serialize};

use super::{Probe, ProviderFuture};

pub use spotify::{MusicCredentials, SpotifyCatalog, SpotifyEndpoints};

/// Placeholder shown for record fields the provider left empty.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// A track as shown to the user, whatever its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Position in a ranked list, when the list is ranked.
    #[serde(default)]
    pub rank: Option<u32>,
    /// Track title.
    pub title: String,
    /// Comma-separated artist names.
    pub artist: String,
    /// Album name.
    pub album: String,
    /// Album release date as reported by the provider.
    #[serde(default)]
    pub release_date: String,
    /// Popularity score, 0 to 100.
    pub popularity: u8,
    /// Track length in milliseconds.
    pub duration_ms: u64,
    /// Canonical link to the track.
    pub url: String,
}

impl TrackRecord {
    /// A record is usable when it names both a track and an artist.
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty() && !self.artist.trim().is_empty()
    }

    /// Duration formatted as `m:ss`.
    pub fn duration_label(&self) -> String {
        let minutes = self.duration_ms / 60_000;
        let seconds = (self.duration_ms % 60_000) / 1_000;
        format!("{minutes}:{seconds:02}")
    }
}

/// Album entry of an artist profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSummary {
    /// Album name.
    pub name: String,
    /// Release date as reported by the provider.
    pub release_date: String,
    /// Number of tracks.
    #[serde(default)]
    pub total_tracks: u32,
}

/// Artist profile as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Artist name.
    pub name: String,
    /// Follower count.
    pub followers: u64,
    /// Popularity score, 0 to 100.
    pub popularity: u8,
    /// Genre labels.
    pub genres: Vec<String>,
    /// Canonical link to the artist.
    pub url: String,
    /// Most popular tracks, best first.
    pub top_tracks: Vec<TrackRecord>,
    /// Recent albums.
    pub albums: Vec<AlbumSummary>,
}

impl ProfileRecord {
    /// A profile is usable when it names the artist.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Client for a music metadata catalog.
pub trait MusicCatalog: Probe {
    /// Returns the current trending tracks for a region, ranked from 1.
    fn top_tracks<'a>(&'a self, region: &'a str, limit: usize)
        -> ProviderFuture<'a, Vec<TrackRecord>>;

    /// Searches tracks by free text.
    fn search_tracks<'a>(&'a self, query: &'a str, limit: usize)
        -> ProviderFuture<'a, Vec<TrackRecord>>;

    /// Looks up an artist by name; `None` when the catalog has no match.
    fn artist_profile<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<ProfileRecord>>;
}
