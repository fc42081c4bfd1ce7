//! Single entry point from utterance to reply text.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, LazyLock};

use anyhow::Result;
use futures::FutureExt;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use super::entities::{extract, EntityKind, ExtractedEntities};
use super::format;
use super::intent::{classify, Intent};
use crate::facade::{Capabilities, Source};
use crate::provider::TextRequest;

/// Trending list length when the utterance names none.
pub const DEFAULT_TRENDING_LIMIT: usize = 10;

/// Longest trending list a chat reply shows.
pub const MAX_TRENDING_LIMIT: usize = 20;

/// Results shown for a search.
pub const SEARCH_LIMIT: usize = 5;

static NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d+").ok());

/// Errors raised while resolving an utterance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A required entity could not be extracted.
    #[error("No {entity} found for {intent} request")]
    InputIncomplete {
        /// Intent that needed the entity.
        intent: Intent,
        /// Human name of the missing entity.
        entity: &'static str,
    },
}

/// Full outcome of one utterance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// Classified intent.
    pub intent: Intent,
    /// Entities extracted for that intent.
    pub entities: ExtractedEntities,
    /// Origin of the data behind the reply; absent for fixed texts.
    pub source: Option<Source>,
    /// Reply text.
    pub text: String,
}

/// Composes classification, extraction and the capability facade.
#[derive(Clone)]
pub struct ChatRouter {
    capabilities: Arc<Capabilities>,
}

impl ChatRouter {
    /// Creates a router owning its capabilities.
    pub fn new(capabilities: Capabilities) -> Self {
        Self::with_shared(Arc::new(capabilities))
    }

    /// Creates a router over shared capabilities.
    pub fn with_shared(capabilities: Arc<Capabilities>) -> Self {
        Self { capabilities }
    }

    /// The capabilities this router calls.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Answers one utterance. Never fails.
    pub async fn respond(&self, utterance: &str) -> String {
        self.respond_detailed(utterance).await.text
    }

    /// Answers one utterance and reports how the answer was produced.
    pub async fn respond_detailed(&self, utterance: &str) -> Reply {
        let intent = classify(utterance);
        let entities = entities_for(intent, utterance);
        debug!(intent = %intent, ?entities, "Classified utterance");

        let outcome = AssertUnwindSafe(self.resolve(intent, &entities, utterance))
            .catch_unwind()
            .await;

        let (text, source) = match outcome {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => match err.downcast_ref::<RouteError>() {
                Some(RouteError::InputIncomplete { intent, entity }) => {
                    debug!(intent = %intent, entity, "Asking for clarification");
                    (format::clarification(*intent).to_string(), None)
                }
                None => {
                    warn!(intent = %intent, error = %err, "Failed to resolve utterance");
                    (format::APOLOGY.to_string(), None)
                }
            },
            Err(_) => {
                error!(intent = %intent, "Panic while resolving utterance");
                (format::APOLOGY.to_string(), None)
            }
        };

        Reply {
            intent,
            entities,
            source,
            text,
        }
    }

    async fn resolve(
        &self,
        intent: Intent,
        entities: &ExtractedEntities,
        utterance: &str,
    ) -> Result<(String, Option<Source>)> {
        let capabilities = &self.capabilities;

        match intent {
            Intent::Trending => {
                let limit = trending_limit(utterance);
                let (tracks, source) = capabilities
                    .fetch_trending(limit, None)
                    .await
                    .into_parts()?;
                Ok((format::trending(&tracks, source), Some(source)))
            }
            Intent::ArtistInfo => {
                let name = required(entities.artist_name.as_deref(), intent, "artist name")?;
                let (profile, source) = capabilities.fetch_profile(name).await.into_parts()?;
                Ok((format::artist_profile(&profile), Some(source)))
            }
            Intent::Lyrics | Intent::Analysis => {
                let title = required(entities.song_title.as_deref(), intent, "song title")?;
                let artist = entities.artist_name.clone();
                let request = if intent == Intent::Lyrics {
                    TextRequest::lyrics(title, artist)
                } else {
                    TextRequest::analysis(title, artist)
                };
                let (text, source) = capabilities.generate_text(&request).await.into_parts()?;
                Ok((format::generated(&text), Some(source)))
            }
            Intent::Search => {
                let query = required(entities.search_query.as_deref(), intent, "search phrase")?;
                let (tracks, source) = capabilities
                    .search(query, SEARCH_LIMIT)
                    .await
                    .into_parts()?;
                Ok((format::search_results(query, &tracks), Some(source)))
            }
            Intent::SmallTalk => {
                let request = TextRequest::chat(utterance.trim());
                let (text, source) = capabilities.generate_text(&request).await.into_parts()?;
                Ok((format::generated(&text), Some(source)))
            }
            Intent::Unknown => Ok((format::OVERVIEW.to_string(), None)),
        }
    }
}

fn entities_for(intent: Intent, utterance: &str) -> ExtractedEntities {
    match intent {
        Intent::ArtistInfo => extract(utterance, EntityKind::Artist),
        Intent::Lyrics | Intent::Analysis => extract(utterance, EntityKind::Song),
        Intent::Search => extract(utterance, EntityKind::Search),
        Intent::Trending | Intent::SmallTalk | Intent::Unknown => ExtractedEntities::default(),
    }
}

fn required<'a>(
    value: Option<&'a str>,
    intent: Intent,
    entity: &'static str,
) -> Result<&'a str, RouteError> {
    value.ok_or(RouteError::InputIncomplete { intent, entity })
}

/// List length named in a trending request, capped at [`MAX_TRENDING_LIMIT`].
pub fn trending_limit(utterance: &str) -> usize {
    NUMBER
        .as_ref()
        .and_then(|number| number.find(utterance))
        .map_or(DEFAULT_TRENDING_LIMIT, |found| {
            found
                .as_str()
                .parse::<usize>()
                .unwrap_or(MAX_TRENDING_LIMIT)
                .clamp(1, MAX_TRENDING_LIMIT)
        })
}
