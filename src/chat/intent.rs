//! Keyword-based intent classification.

use std::fmt;

use serde::Serialize;

/// What the user is asking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Current chart list.
    Trending,
    /// Lyrics for a song.
    Lyrics,
    /// Musical analysis of a song.
    Analysis,
    /// Track search by free text.
    Search,
    /// Artist profile.
    ArtistInfo,
    /// Greetings and thanks.
    SmallTalk,
    /// Anything else; answered with the capability overview.
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trending => "trending",
            Self::Lyrics => "lyrics",
            Self::Analysis => "analysis",
            Self::Search => "search",
            Self::ArtistInfo => "artist_info",
            Self::SmallTalk => "small_talk",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

pub(crate) const TRENDING_KEYWORDS: &[&str] = &[
    "trending",
    "popular",
    "top songs",
    "chart",
    "hits",
    "what's hot",
    "current hits",
    "latest songs",
];

const LYRICS_KEYWORDS: &[&str] = &["lyrics", "words", "text of song", "song words"];

const ANALYSIS_KEYWORDS: &[&str] = &["analyze", "analyse", "analysis", "meaning of"];

const SEARCH_KEYWORDS: &[&str] = &["search", "find", "look for", "song called"];

const ARTIST_KEYWORDS: &[&str] = &[
    "artist",
    "singer",
    "band",
    "musician",
    "about",
    "biography",
    "discography",
    "albums",
];

const SMALL_TALK_KEYWORDS: &[&str] = &[
    "hello",
    "thanks",
    "thank you",
    "good morning",
    "good evening",
    "how are you",
    "greetings",
];

/// Intents in priority order with their trigger keywords.
const PRIORITY: &[(Intent, &[&str])] = &[
    (Intent::Trending, TRENDING_KEYWORDS),
    (Intent::Lyrics, LYRICS_KEYWORDS),
    (Intent::Analysis, ANALYSIS_KEYWORDS),
    (Intent::Search, SEARCH_KEYWORDS),
    (Intent::ArtistInfo, ARTIST_KEYWORDS),
    (Intent::SmallTalk, SMALL_TALK_KEYWORDS),
];

/// Maps an utterance to exactly one intent.
///
/// The first intent in priority order with a keyword contained in the
/// lower-cased utterance wins.
pub fn classify(utterance: &str) -> Intent {
    let text = utterance.to_lowercase();
    PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map_or(Intent::Unknown, |(intent, _)| *intent)
}
