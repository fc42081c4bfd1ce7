//! Pattern-based entity extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Which entities an extraction looks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// An artist name.
    Artist,
    /// A song title with an optional artist.
    Song,
    /// A free-text search phrase.
    Search,
}

/// Entities pulled out of an utterance. Every field may be absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    /// Song title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_title: Option<String>,
    /// Artist name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist_name: Option<String>,
    /// Search phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl ExtractedEntities {
    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.song_title.is_none() && self.artist_name.is_none() && self.search_query.is_none()
    }
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(&format!("(?i){pattern}")) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!(pattern, error = %e, "Invalid entity pattern");
                None
            }
        })
        .collect()
}

static ARTIST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"about\s+([^?.!]+)",
        r"artist\s+([^?.!]+)",
        r"singer\s+([^?.!]+)",
        r"band\s+([^?.!]+)",
        r"musician\s+([^?.!]+)",
    ])
});

// Two-group "song by artist" forms come first.
static SONG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"lyrics\s+for\s+([^?.!]+)\s+by\s+([^?.!]+)",
        r"lyrics\s+of\s+([^?.!]+)\s+by\s+([^?.!]+)",
        r"([^?.!]+)\s+by\s+([^?.!]+)\s+lyrics",
        r"(?:analy[sz]e|analysis\s+of|meaning\s+of)\s+([^?.!]+)\s+by\s+([^?.!]+)",
        r"lyrics\s+(?:for|of)\s+([^?.!]+)",
        r"lyrics\s+([^?.!]+)",
        r"(?:analy[sz]e|analysis\s+of|meaning\s+of)\s+([^?.!]+)",
    ])
});

static SEARCH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"search\s+for\s+([^?.!]+)",
        r"find\s+([^?.!]+)",
        r"look\s+for\s+([^?.!]+)",
        r"song\s+called\s+([^?.!]+)",
        r"search\s+([^?.!]+)",
    ])
});

/// Strips surrounding whitespace, quotes and sentence punctuation.
fn clean(capture: &str) -> Option<String> {
    let cleaned = capture
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '"' | '\'' | ',' | ';' | ':' | '“' | '”' | '‘' | '’')
        })
        .to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Returns the captures of the first matching pattern.
fn first_match(patterns: &[Regex], utterance: &str) -> Option<(Option<String>, Option<String>)> {
    patterns.iter().find_map(|pattern| {
        pattern.captures(utterance).map(|captures| {
            (
                captures.get(1).and_then(|m| clean(m.as_str())),
                captures.get(2).and_then(|m| clean(m.as_str())),
            )
        })
    })
}

/// Extracts the entities of `kind` from an utterance.
///
/// Matching is case-insensitive and the first matching pattern wins;
/// extracted text keeps the input's casing.
pub fn extract(utterance: &str, kind: EntityKind) -> ExtractedEntities {
    let mut entities = ExtractedEntities::default();

    match kind {
        EntityKind::Artist => {
            if let Some((artist, _)) = first_match(&ARTIST_PATTERNS, utterance) {
                entities.artist_name = artist;
            }
        }
        EntityKind::Song => {
            if let Some((song, artist)) = first_match(&SONG_PATTERNS, utterance) {
                entities.song_title = song;
                entities.artist_name = artist;
            }
        }
        EntityKind::Search => {
            if let Some((query, _)) = first_match(&SEARCH_PATTERNS, utterance) {
                entities.search_query = query;
            }
        }
    }

    entities
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn song(utterance: &str) -> (Option<String>, Option<String>) {
        let entities = extract(utterance, EntityKind::Song);
        (entities.song_title, entities.artist_name)
    }

    #[test]
    fn every_pattern_compiles() {
        assert_eq!(ARTIST_PATTERNS.len(), 5);
        assert_eq!(SONG_PATTERNS.len(), 7);
        assert_eq!(SEARCH_PATTERNS.len(), 5);
    }

    #[test]
    fn lyrics_for_song_by_artist() {
        assert_eq!(
            song("lyrics for Anti-Hero by Taylor Swift"),
            (Some("Anti-Hero".into()), Some("Taylor Swift".into()))
        );
    }

    #[test]
    fn lyrics_without_artist() {
        assert_eq!(song("lyrics Yellow"), (Some("Yellow".into()), None));
        assert_eq!(song("Lyrics for Yellow?"), (Some("Yellow".into()), None));
    }

    #[test]
    fn song_by_artist_lyrics_suffix() {
        assert_eq!(
            song("Heat Waves by Glass Animals lyrics"),
            (Some("Heat Waves".into()), Some("Glass Animals".into()))
        );
    }

    #[test]
    fn analysis_forms() {
        assert_eq!(
            song("Analyze 'Flowers' by Miley Cyrus!"),
            (Some("Flowers".into()), Some("Miley Cyrus".into()))
        );
        assert_eq!(song("what is the meaning of Hallelujah"), (Some("Hallelujah".into()), None));
    }

    #[test]
    fn artist_keeps_casing() {
        let entities = extract("TELL ME ABOUT the Weeknd?", EntityKind::Artist);
        assert_eq!(entities.artist_name.as_deref(), Some("the Weeknd"));
    }

    #[test]
    fn search_phrases() {
        let query = |u: &str| extract(u, EntityKind::Search).search_query;
        assert_eq!(query("Search for Blinding Lights"), Some("Blinding Lights".into()));
        assert_eq!(query("can you find \"Levitating\"?"), Some("Levitating".into()));
        assert_eq!(query("search Espresso"), Some("Espresso".into()));
    }

    #[test]
    fn no_match_is_empty() {
        assert!(extract("Tell me about", EntityKind::Artist).is_empty());
        assert!(extract("Tell me about   ?", EntityKind::Artist).is_empty());
        assert!(extract("lyrics", EntityKind::Song).is_empty());
        assert!(extract("hello", EntityKind::Search).is_empty());
    }
}
