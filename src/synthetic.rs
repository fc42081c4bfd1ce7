//! Fixed corpus served when a provider is unavailable.
//!
//! Every answer here is deterministic: the same request always yields the
//! same records and text, and every record field is populated.

use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

use crate::provider::music::AlbumSummary;
use crate::provider::{GeneratedText, ProfileRecord, Style, TextKind, TextRequest, TrackRecord};

/// Attribution for text produced from the corpus.
pub const SYNTHETIC_ENGINE: &str = "Fallback Lyrics Engine";

/// Error raised when the embedded corpus cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to parse synthetic corpus: {0}")]
pub struct CorpusError(String);

#[derive(Debug, Clone, Deserialize)]
struct ProfileTemplate {
    followers: u64,
    popularity: u8,
    genres: Vec<String>,
    url: String,
    top_tracks: Vec<TrackTemplate>,
    albums: Vec<AlbumSummary>,
}

#[derive(Debug, Clone, Deserialize)]
struct TrackTemplate {
    title: String,
    album: String,
    release_date: String,
    popularity: u8,
    duration_ms: u64,
    url: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleTemplate {
    verse: String,
    chorus: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LyricsTemplates {
    styles: StyleTemplates,
    skeleton: String,
    note: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleTemplates {
    pop: StyleTemplate,
    rock: StyleTemplate,
    country: StyleTemplate,
}

/// Curated tracks, profile template and text templates.
#[derive(Debug, Clone, Deserialize)]
pub struct SyntheticCorpus {
    trending: Vec<TrackRecord>,
    profile: ProfileTemplate,
    lyrics: LyricsTemplates,
    analysis: String,
    chat: Vec<String>,
}

impl SyntheticCorpus {
    /// Loads the corpus embedded in the binary.
    pub fn load() -> Result<Self, CorpusError> {
        Self::from_yaml(include_str!("templates/corpus.yaml"))
    }

    /// Parses a corpus from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, CorpusError> {
        let corpus: Self = serde_yaml::from_str(yaml).map_err(|e| CorpusError(e.to_string()))?;
        if corpus.trending.is_empty() {
            return Err(CorpusError("trending list is empty".to_string()));
        }
        if corpus.chat.is_empty() {
            return Err(CorpusError("chat replies are empty".to_string()));
        }
        Ok(corpus)
    }

    /// The curated ranked list, truncated to `limit`.
    pub fn trending(&self, limit: usize) -> Vec<TrackRecord> {
        self.trending.iter().take(limit).cloned().collect()
    }

    /// Degraded search answer, always empty.
    pub fn search(&self, _query: &str) -> Vec<TrackRecord> {
        Vec::new()
    }

    /// Profile for `name` with placeholder statistics.
    pub fn profile(&self, name: &str) -> ProfileRecord {
        let template = &self.profile;
        ProfileRecord {
            name: name.to_string(),
            followers: template.followers,
            popularity: template.popularity,
            genres: template.genres.clone(),
            url: template.url.clone(),
            top_tracks: template
                .top_tracks
                .iter()
                .map(|track| TrackRecord {
                    rank: None,
                    title: track.title.clone(),
                    artist: name.to_string(),
                    album: track.album.clone(),
                    release_date: track.release_date.clone(),
                    popularity: track.popularity,
                    duration_ms: track.duration_ms,
                    url: track.url.clone(),
                })
                .collect(),
            albums: template.albums.clone(),
        }
    }

    /// Templated text for a generation request.
    pub fn text(&self, request: &TextRequest) -> GeneratedText {
        let (text, note) = match request.kind {
            TextKind::Lyrics => (self.lyrics(request), Some(self.lyrics.note.clone())),
            TextKind::Analysis => (render(&self.analysis, request), None),
            TextKind::Chat => (self.chat_reply(&request.topic).to_string(), None),
        };

        GeneratedText {
            kind: request.kind,
            topic: request.topic.clone(),
            artist: request.artist_or_unknown().to_string(),
            text,
            generated_by: SYNTHETIC_ENGINE.to_string(),
            note,
        }
    }

    fn lyrics(&self, request: &TextRequest) -> String {
        let styles = &self.lyrics.styles;
        let style = match request.style {
            Style::Pop => &styles.pop,
            Style::Rock => &styles.rock,
            Style::Country => &styles.country,
        };

        let body = self
            .lyrics
            .skeleton
            .replace("{verse}", &style.verse)
            .replace("{chorus}", &style.chorus);
        render(&body, request)
    }

    /// Canned reply picked by a stable hash of the utterance.
    pub fn chat_reply(&self, utterance: &str) -> &str {
        let index = (stable_hash(utterance.trim()) % self.chat.len() as u64) as usize;
        &self.chat[index]
    }
}

/// Fills the request placeholders of a template.
fn render(template: &str, request: &TextRequest) -> String {
    template
        .replace("{title_lower}", &request.topic.to_lowercase())
        .replace("{title}", &request.topic)
        .replace("{artist}", request.artist_or_unknown())
        .replace("{style}", request.style.as_str())
}

/// FNV-1a, stable across runs and toolchains.
fn stable_hash(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

static SYNTHETIC_CORPUS: OnceLock<Result<SyntheticCorpus, CorpusError>> = OnceLock::new();

/// Returns the process-wide synthetic corpus.
pub fn get_synthetic_corpus() -> Result<&'static SyntheticCorpus, CorpusError> {
    SYNTHETIC_CORPUS
        .get_or_init(SyntheticCorpus::load)
        .as_ref()
        .map_err(Clone::clone)
}
