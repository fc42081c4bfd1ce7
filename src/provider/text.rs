//! Text generation requests and client trait.

pub mod openai;

use serde::Serialize;

use super::{GenerationVariant, Probe, ProviderError, ProviderFuture};

pub use openai::{OpenAiTextClient, TextCredentials, DEFAULT_OPENAI_BASE};

/// Artist name used when a lyrics request does not name one.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// What a generation request is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    /// Original lyrics for a song title.
    Lyrics,
    /// Musical analysis of a song.
    Analysis,
    /// Free conversation about music.
    Chat,
}

impl TextKind {
    /// Shortest live answer accepted for this kind, in characters.
    pub fn min_length(self) -> usize {
        match self {
            Self::Lyrics | Self::Analysis => 50,
            Self::Chat => 20,
        }
    }
}

/// Musical style used to shape generated lyrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Default style.
    Pop,
    /// Rock, metal and punk acts.
    Rock,
    /// Country, folk and bluegrass acts.
    Country,
}

impl Style {
    /// Guesses a style from words in the artist name.
    pub fn infer(artist: &str) -> Self {
        let artist = artist.to_lowercase();
        if ["rock", "metal", "punk"].iter().any(|w| artist.contains(w)) {
            Self::Rock
        } else if ["country", "folk", "bluegrass"]
            .iter()
            .any(|w| artist.contains(w))
        {
            Self::Country
        } else {
            Self::Pop
        }
    }

    /// Lower-case label used in prompts and corpus keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pop => "pop",
            Self::Rock => "rock",
            Self::Country => "country",
        }
    }
}

/// One generation request: a topic plus the style to write it in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    /// Request purpose.
    pub kind: TextKind,
    /// Song title, or the user's words for chat.
    pub topic: String,
    /// Artist the topic belongs to, if known.
    pub artist: Option<String>,
    /// Style to write in.
    pub style: Style,
}

impl TextRequest {
    /// Lyrics for a song, style inferred from the artist.
    pub fn lyrics(title: impl Into<String>, artist: Option<String>) -> Self {
        let style = artist.as_deref().map_or(Style::Pop, Style::infer);
        Self {
            kind: TextKind::Lyrics,
            topic: title.into(),
            artist,
            style,
        }
    }

    /// Analysis of a song.
    pub fn analysis(title: impl Into<String>, artist: Option<String>) -> Self {
        Self {
            kind: TextKind::Analysis,
            topic: title.into(),
            artist,
            style: Style::Pop,
        }
    }

    /// Conversational reply to the user's words.
    pub fn chat(utterance: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Chat,
            topic: utterance.into(),
            artist: None,
            style: Style::Pop,
        }
    }

    /// Artist name, or [`UNKNOWN_ARTIST`].
    pub fn artist_or_unknown(&self) -> &str {
        self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)
    }

    /// Builds the prompt for a zero-based attempt.
    ///
    /// Later attempts get a shorter prompt to match their smaller budget.
    pub fn prompt(&self, attempt: usize) -> GenerationPrompt {
        let artist = self.artist_or_unknown();
        let style = self.style.as_str();
        let topic = &self.topic;

        match self.kind {
            TextKind::Lyrics => GenerationPrompt {
                system: "Write original song lyrics. Be creative and concise.".to_string(),
                user: if attempt == 0 {
                    format!(
                        "Write song lyrics for '{topic}' by {artist} in {style} style. \
                         Include verse, chorus, verse, chorus, bridge, chorus."
                    )
                } else {
                    format!("Create {style} song lyrics titled '{topic}'. Include verses and chorus.")
                },
            },
            TextKind::Analysis => GenerationPrompt {
                system: "You are a music expert and critic who provides insightful analysis \
                         of songs and artists."
                    .to_string(),
                user: if attempt == 0 {
                    format!(
                        "Provide a musical analysis of the song \"{topic}\" by {artist}. \
                         Cover style and genre, themes, emotional tone, cultural impact, \
                         and why it might be popular."
                    )
                } else {
                    format!("Briefly analyze the song \"{topic}\" by {artist}.")
                },
            },
            TextKind::Chat => GenerationPrompt {
                system: "You are a music assistant. Be helpful and enthusiastic about music."
                    .to_string(),
                user: topic.clone(),
            },
        }
    }

    /// Rejects live answers too short to be useful.
    pub fn validate(&self, text: String) -> Result<String, ProviderError> {
        let text = text.trim().to_string();
        let length = text.chars().count();
        if length < self.kind.min_length() {
            return Err(ProviderError::MalformedResponse(format!(
                "response of {length} characters is shorter than {}",
                self.kind.min_length()
            )));
        }
        Ok(text)
    }
}

/// System and user prompt pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationPrompt {
    /// Instructions for the model.
    pub system: String,
    /// The request itself.
    pub user: String,
}

/// Generated text with its attribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    /// Request purpose.
    pub kind: TextKind,
    /// Song title or chat topic.
    pub topic: String,
    /// Artist, or [`UNKNOWN_ARTIST`].
    pub artist: String,
    /// The text itself.
    pub text: String,
    /// Which engine produced the text.
    pub generated_by: String,
    /// Extra remark shown under the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Client for a generative text service.
pub trait TextGenerator: Probe {
    /// Generates text for a prompt with one model variant.
    fn generate<'a>(
        &'a self,
        prompt: &'a GenerationPrompt,
        variant: &'a GenerationVariant,
    ) -> ProviderFuture<'a, String>;
}
