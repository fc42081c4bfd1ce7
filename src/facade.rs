//! Stable capability operations over the two providers.
//!
//! Every operation returns a [`CapabilityResult`] tagged with its [`Source`].
//! Live calls run only against a connected provider and under a per-attempt
//! timeout; any failure, and any unavailable provider, is answered from the
//! synthetic corpus instead. Raw provider errors never leave this module.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::provider::music::SpotifyCatalog;
use crate::provider::text::OpenAiTextClient;
use crate::provider::{
    get_provider_profiles, BringUp, GeneratedText, GenerationLadder, MusicCatalog, ProfileRecord,
    ProviderConfig, ProviderError, ProviderHandle, ProviderKind, TextGenerator, TextRequest,
    TrackRecord,
};
use crate::synthetic::{get_synthetic_corpus, SyntheticCorpus};
use crate::utils::preflight::{check_music_credentials, check_text_credentials};
use crate::utils::settings::ChatSettings;

/// Largest trending or search list a caller may ask for.
pub const MAX_LIST_LIMIT: usize = 50;

/// Where a successful payload came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Answered by a connected provider.
    Live,
    /// Answered from the synthetic corpus.
    Synthetic,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Outcome of a capability operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapabilityResult<T> {
    /// A usable payload and where it came from.
    Success {
        /// The payload.
        value: T,
        /// Its origin.
        source: Source,
    },
    /// The live attempt failed; never returned by the public operations.
    Failure(ProviderError),
}

impl<T> CapabilityResult<T> {
    /// Wraps a live payload.
    pub fn live(value: T) -> Self {
        Self::Success {
            value,
            source: Source::Live,
        }
    }

    /// Wraps a synthetic payload.
    pub fn synthetic(value: T) -> Self {
        Self::Success {
            value,
            source: Source::Synthetic,
        }
    }

    /// Replaces a failure with the synthetic payload built by `fallback`.
    pub fn or_synthetic<F>(self, operation: &str, fallback: F) -> Self
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Failure(reason) => {
                info!(operation, reason = %reason, "Using synthetic fallback");
                Self::synthetic(fallback())
            }
            success => success,
        }
    }

    /// Origin of the payload, if any.
    pub fn source(&self) -> Option<Source> {
        match self {
            Self::Success { source, .. } => Some(*source),
            Self::Failure(_) => None,
        }
    }

    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Splits a success into payload and source.
    pub fn into_parts(self) -> Result<(T, Source), ProviderError> {
        match self {
            Self::Success { value, source } => Ok((value, source)),
            Self::Failure(reason) => Err(reason),
        }
    }
}

/// Provider handles plus the synthetic corpus, injected into the router.
pub struct Capabilities {
    music: BringUp<dyn MusicCatalog>,
    text: BringUp<dyn TextGenerator>,
    corpus: &'static SyntheticCorpus,
    generation: GenerationLadder,
    region: String,
}

impl Capabilities {
    /// Assembles a facade from explicit parts.
    pub fn new(
        music: BringUp<dyn MusicCatalog>,
        text: BringUp<dyn TextGenerator>,
        corpus: &'static SyntheticCorpus,
        generation: GenerationLadder,
        region: impl Into<String>,
    ) -> Self {
        Self {
            music,
            text,
            corpus,
            generation,
            region: region.into(),
        }
    }

    /// Reads settings from the environment and wires the live clients.
    pub fn from_environment() -> Result<Self> {
        let settings = ChatSettings::load().context("Failed to load settings")?;
        Self::from_settings(&settings)
    }

    /// Wires the live clients for the given settings.
    ///
    /// Missing or placeholder credentials leave the provider unavailable;
    /// they are not an error here.
    pub fn from_settings(settings: &ChatSettings) -> Result<Self> {
        let profiles = get_provider_profiles().context("Failed to load provider profiles")?;
        let corpus = get_synthetic_corpus().context("Failed to load synthetic corpus")?;

        let music_credentials = check_music_credentials(settings);
        let endpoints = settings.spotify.clone();
        let music_check = music_credentials.as_ref().map(|_| ()).map_err(Clone::clone);
        let music = BringUp::new(
            ProviderKind::MusicCatalog,
            profiles.music.clone(),
            music_check,
            move |config: &ProviderConfig| -> Result<Arc<dyn MusicCatalog>, ProviderError> {
                let credentials = music_credentials.clone()?;
                let client: Arc<dyn MusicCatalog> = Arc::new(SpotifyCatalog::connect(
                    credentials,
                    endpoints.clone(),
                    config,
                )?);
                Ok(client)
            },
        );

        let text_credentials = check_text_credentials(settings);
        let base_url = settings.openai_base.clone();
        let text_check = text_credentials.as_ref().map(|_| ()).map_err(Clone::clone);
        let text = BringUp::new(
            ProviderKind::TextGeneration,
            profiles.text.clone(),
            text_check,
            move |config: &ProviderConfig| -> Result<Arc<dyn TextGenerator>, ProviderError> {
                let credentials = text_credentials.clone()?;
                let client: Arc<dyn TextGenerator> = Arc::new(OpenAiTextClient::connect(
                    credentials,
                    base_url.clone(),
                    config,
                )?);
                Ok(client)
            },
        );

        Ok(Self::new(
            music,
            text,
            corpus,
            profiles.generation.clone(),
            settings.region.clone(),
        ))
    }

    /// A facade with both providers unavailable.
    pub fn offline(region: impl Into<String>) -> Result<Self> {
        let profiles = get_provider_profiles().context("Failed to load provider profiles")?;
        let corpus = get_synthetic_corpus().context("Failed to load synthetic corpus")?;
        let reason = || ProviderError::ConfigMissing("offline mode".to_string());

        Ok(Self::new(
            BringUp::disabled(ProviderKind::MusicCatalog, reason()),
            BringUp::disabled(ProviderKind::TextGeneration, reason()),
            corpus,
            profiles.generation.clone(),
            region,
        ))
    }

    /// Runs bring-up for both providers concurrently.
    pub async fn bring_up(&self) {
        tokio::join!(self.music.handle(), self.text.handle());
    }

    /// Music catalog bring-up manager.
    pub fn music(&self) -> &BringUp<dyn MusicCatalog> {
        &self.music
    }

    /// Text generation bring-up manager.
    pub fn text(&self) -> &BringUp<dyn TextGenerator> {
        &self.text
    }

    /// Configured default region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Ranked trending tracks for a region, at most `limit` of them.
    pub async fn fetch_trending(
        &self,
        limit: usize,
        region: Option<&str>,
    ) -> CapabilityResult<Vec<TrackRecord>> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let region = region.unwrap_or(&self.region);

        let live = match self.music.handle().await {
            ProviderHandle::Connected { config, client } => {
                live_call("trending", call_budget(config), async {
                    let tracks = client.top_tracks(region, limit).await?;
                    non_empty(well_formed(tracks, limit), "no trending tracks")
                })
                .await
            }
            handle => CapabilityResult::Failure(unavailable_reason(handle)),
        };

        live.or_synthetic("trending", || self.corpus.trending(limit))
    }

    /// Tracks matching a free-text query.
    pub async fn search(&self, query: &str, limit: usize) -> CapabilityResult<Vec<TrackRecord>> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);

        let live = match self.music.handle().await {
            ProviderHandle::Connected { config, client } => {
                live_call("search", call_budget(config), async {
                    let tracks = client.search_tracks(query, limit).await?;
                    non_empty(well_formed(tracks, limit), "no matching tracks")
                })
                .await
            }
            handle => CapabilityResult::Failure(unavailable_reason(handle)),
        };

        live.or_synthetic("search", || self.corpus.search(query))
    }

    /// Artist profile by name.
    pub async fn fetch_profile(&self, name: &str) -> CapabilityResult<ProfileRecord> {
        let live = match self.music.handle().await {
            ProviderHandle::Connected { config, client } => {
                live_call("profile", call_budget(config), async {
                    match client.artist_profile(name).await? {
                        Some(profile) if profile.is_well_formed() => Ok(profile),
                        Some(_) => Err(ProviderError::MalformedResponse(
                            "artist profile has no name".to_string(),
                        )),
                        None => Err(ProviderError::MalformedResponse(format!(
                            "no artist matched '{name}'"
                        ))),
                    }
                })
                .await
            }
            handle => CapabilityResult::Failure(unavailable_reason(handle)),
        };

        live.or_synthetic("profile", || self.corpus.profile(name))
    }

    /// Generated text for a request.
    ///
    /// Tries each generation variant in order with a shrinking token budget.
    /// Recoverable failures move on to the next variant after a fixed delay;
    /// a permanent failure stops immediately. Exhaustion yields templated
    /// text.
    pub async fn generate_text(&self, request: &TextRequest) -> CapabilityResult<GeneratedText> {
        let live = match self.text.handle().await {
            ProviderHandle::Connected { client, .. } => {
                self.generate_live(client.as_ref(), request).await
            }
            handle => CapabilityResult::Failure(unavailable_reason(handle)),
        };

        live.or_synthetic("generate_text", || self.corpus.text(request))
    }

    async fn generate_live(
        &self,
        client: &dyn TextGenerator,
        request: &TextRequest,
    ) -> CapabilityResult<GeneratedText> {
        let variants = self.generation.variants();
        let mut last_error = None;

        for (attempt, variant) in variants.iter().enumerate() {
            let prompt = request.prompt(attempt);
            debug!(
                attempt = attempt + 1,
                model = %variant.model,
                max_tokens = variant.max_tokens,
                "Generating text"
            );

            let outcome =
                match tokio::time::timeout(variant.timeout(), client.generate(&prompt, variant))
                    .await
                {
                    Ok(result) => result.and_then(|text| request.validate(text)),
                    Err(_) => Err(ProviderError::Timeout),
                };

            match outcome {
                Ok(text) => {
                    info!(model = %variant.model, attempt = attempt + 1, "Generated text");
                    return CapabilityResult::live(GeneratedText {
                        kind: request.kind,
                        topic: request.topic.clone(),
                        artist: request.artist_or_unknown().to_string(),
                        text,
                        generated_by: format!("AI ({})", variant.model),
                        note: None,
                    });
                }
                Err(error) => {
                    warn!(
                        model = %variant.model,
                        attempt = attempt + 1,
                        error = %error,
                        "Generation attempt failed"
                    );
                    let recoverable = error.is_recoverable();
                    last_error = Some(error);
                    if !recoverable {
                        break;
                    }
                    let delay = self.generation.delay();
                    if attempt + 1 < variants.len() && !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        CapabilityResult::Failure(last_error.unwrap_or_else(|| {
            ProviderError::MalformedResponse("no generation variants".to_string())
        }))
    }
}

/// Upper bound for one live operation, covering the client's own retries.
fn call_budget(config: &ProviderConfig) -> Duration {
    config.timeout().saturating_mul(config.max_retries + 1)
}

async fn live_call<T, F>(operation: &str, budget: Duration, call: F) -> CapabilityResult<T>
where
    F: std::future::Future<Output = Result<T, ProviderError>>,
{
    let outcome = match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout),
    };

    match outcome {
        Ok(value) => {
            debug!(operation, "Live call succeeded");
            CapabilityResult::live(value)
        }
        Err(error) => {
            warn!(operation, error = %error, "Live call failed");
            CapabilityResult::Failure(error)
        }
    }
}

/// Drops ill-formed records, caps the list and closes rank gaps.
fn well_formed(tracks: Vec<TrackRecord>, limit: usize) -> Vec<TrackRecord> {
    tracks
        .into_iter()
        .filter(TrackRecord::is_well_formed)
        .take(limit)
        .enumerate()
        .map(|(i, mut track)| {
            if track.rank.is_some() {
                track.rank = Some(i as u32 + 1);
            }
            track
        })
        .collect()
}

fn non_empty(tracks: Vec<TrackRecord>, what: &str) -> Result<Vec<TrackRecord>, ProviderError> {
    if tracks.is_empty() {
        Err(ProviderError::MalformedResponse(what.to_string()))
    } else {
        Ok(tracks)
    }
}

fn unavailable_reason<C: ?Sized>(handle: &ProviderHandle<C>) -> ProviderError {
    match handle {
        ProviderHandle::Unavailable { failures } => failures.last().map_or_else(
            || ProviderError::ConfigMissing("provider unavailable".to_string()),
            |failure| failure.error.clone(),
        ),
        _ => ProviderError::ConfigMissing("provider not connected".to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::provider::test_utils::{
        connected, sample_track, MockMusicCatalog, MockTextGenerator,
    };
    use crate::provider::{GenerationVariant, ProviderLadder, TextKind};

    fn ladder(variants: Vec<GenerationVariant>) -> GenerationLadder {
        GenerationLadder::new(variants, Duration::ZERO).unwrap()
    }

    fn default_ladder() -> GenerationLadder {
        ladder(vec![
            GenerationVariant::new("large", 800, 5),
            GenerationVariant::new("medium", 600, 5),
            GenerationVariant::new("small", 500, 5),
        ])
    }

    fn offline_music() -> BringUp<dyn MusicCatalog> {
        BringUp::disabled(
            ProviderKind::MusicCatalog,
            ProviderError::ConfigMissing("SPOTIFY_CLIENT_ID is not set".into()),
        )
    }

    fn offline_text() -> BringUp<dyn TextGenerator> {
        BringUp::disabled(
            ProviderKind::TextGeneration,
            ProviderError::ConfigMissing("OPENAI_API_KEY is not set".into()),
        )
    }

    fn with_music(catalog: MockMusicCatalog) -> Capabilities {
        Capabilities::new(
            connected(ProviderKind::MusicCatalog, Arc::new(catalog) as Arc<dyn MusicCatalog>),
            offline_text(),
            get_synthetic_corpus().unwrap(),
            default_ladder(),
            "US",
        )
    }

    fn with_text(generator: MockTextGenerator, generation: GenerationLadder) -> Capabilities {
        Capabilities::new(
            offline_music(),
            connected(
                ProviderKind::TextGeneration,
                Arc::new(generator) as Arc<dyn TextGenerator>,
            ),
            get_synthetic_corpus().unwrap(),
            generation,
            "US",
        )
    }

    const LONG_LYRICS: &str = "[Verse 1]\nNeon rivers run beneath the midnight train\n\
                               [Chorus]\nWe keep on dancing through the rain";

    #[tokio::test]
    async fn unavailable_trending_returns_exactly_limit_synthetic_records() {
        let capabilities = Capabilities::offline("US").unwrap();

        let (tracks, source) = capabilities.fetch_trending(5, None).await.into_parts().unwrap();
        assert_eq!(source, Source::Synthetic);
        assert_eq!(tracks.len(), 5);
        for track in &tracks {
            assert!(track.is_well_formed());
            assert!(track.rank.is_some());
            assert!(!track.album.is_empty());
            assert!(!track.url.is_empty());
            assert!(track.popularity > 0);
            assert!(track.duration_ms > 0);
        }
    }

    #[tokio::test]
    async fn live_trending_is_tagged_live() {
        let catalog = MockMusicCatalog::new().with_trending(Ok(vec![
            sample_track(Some(1), "Espresso", "Sabrina Carpenter"),
            sample_track(Some(2), "", "Nobody"),
            sample_track(Some(3), "Birds of a Feather", "Billie Eilish"),
        ]));
        let calls = catalog.call_handle();
        let capabilities = with_music(catalog);

        let (tracks, source) = capabilities
            .fetch_trending(10, Some("GB"))
            .await
            .into_parts()
            .unwrap();
        assert_eq!(source, Source::Live);
        assert_eq!(tracks.len(), 2);
        assert_eq!(calls.calls(), vec!["top_tracks GB 10".to_string()]);
    }

    #[tokio::test]
    async fn dropped_trending_records_leave_no_rank_gap() {
        let catalog = MockMusicCatalog::new().with_trending(Ok(vec![
            sample_track(Some(1), "Espresso", "Sabrina Carpenter"),
            sample_track(Some(2), "Taste", ""),
            sample_track(Some(3), "Birds of a Feather", "Billie Eilish"),
            sample_track(Some(4), "APT.", "ROSE, Bruno Mars"),
        ]));
        let capabilities = with_music(catalog);

        let (tracks, _) = capabilities
            .fetch_trending(10, None)
            .await
            .into_parts()
            .unwrap();
        let ranked: Vec<_> = tracks.iter().map(|t| (t.rank, t.title.as_str())).collect();
        assert_eq!(
            ranked,
            vec![
                (Some(1), "Espresso"),
                (Some(2), "Birds of a Feather"),
                (Some(3), "APT."),
            ]
        );
    }

    #[tokio::test]
    async fn empty_live_trending_falls_back() {
        let capabilities = with_music(MockMusicCatalog::new().with_trending(Ok(Vec::new())));

        let result = capabilities.fetch_trending(3, None).await;
        assert_eq!(result.source(), Some(Source::Synthetic));
        assert_eq!(result.into_parts().unwrap().0.len(), 3);
    }

    #[tokio::test]
    async fn slow_catalog_times_out_to_synthetic() {
        let catalog = MockMusicCatalog::new()
            .with_call_delay(Duration::from_millis(200))
            .with_search(Ok(vec![sample_track(None, "Late", "Slowpoke")]));
        let config = ProviderConfig::new("instant", 0, 0);
        let capabilities = Capabilities::new(
            BringUp::new(
                ProviderKind::MusicCatalog,
                ProviderLadder::new(
                    vec![config],
                    Duration::from_secs(1),
                    Duration::ZERO,
                ),
                Ok(()),
                {
                    let client: Arc<dyn MusicCatalog> = Arc::new(catalog);
                    move |_: &ProviderConfig| -> Result<Arc<dyn MusicCatalog>, ProviderError> {
                        Ok(Arc::clone(&client))
                    }
                },
            ),
            offline_text(),
            get_synthetic_corpus().unwrap(),
            default_ladder(),
            "US",
        );

        let result = capabilities.search("late", 5).await;
        assert_eq!(result.source(), Some(Source::Synthetic));
        assert!(result.into_parts().unwrap().0.is_empty());
    }

    #[tokio::test]
    async fn unavailable_catalog_makes_no_calls() {
        let catalog = MockMusicCatalog::new().with_probe(Err(ProviderError::Auth("bad".into())));
        let calls = catalog.call_handle();
        let capabilities = with_music(catalog);

        let result = capabilities.search("anything", 5).await;
        assert_eq!(result.source(), Some(Source::Synthetic));
        assert!(capabilities.music().state().is_unavailable());
        assert_eq!(calls.count(), 0);
    }

    #[tokio::test]
    async fn missing_profile_is_synthetic() {
        let capabilities = with_music(MockMusicCatalog::new().with_profile(Ok(None)));

        let (profile, source) = capabilities
            .fetch_profile("Nobody Famous")
            .await
            .into_parts()
            .unwrap();
        assert_eq!(source, Source::Synthetic);
        assert_eq!(profile.name, "Nobody Famous");
    }

    #[tokio::test]
    async fn generation_succeeds_on_first_variant() {
        let generator = MockTextGenerator::new(vec![Ok(LONG_LYRICS.to_string())]);
        let requests = generator.request_handle();
        let capabilities = with_text(generator, default_ladder());

        let request = TextRequest::lyrics("Midnight Train", Some("The Weeknd".into()));
        let (text, source) = capabilities
            .generate_text(&request)
            .await
            .into_parts()
            .unwrap();
        assert_eq!(source, Source::Live);
        assert_eq!(text.generated_by, "AI (large)");
        assert_eq!(text.kind, TextKind::Lyrics);
        assert_eq!(requests.request_count(), 1);
    }

    #[tokio::test]
    async fn always_timing_out_generation_makes_three_shrinking_attempts() {
        let generator = MockTextGenerator::new(vec![
            Ok(LONG_LYRICS.to_string()),
            Ok(LONG_LYRICS.to_string()),
            Ok(LONG_LYRICS.to_string()),
            Ok(LONG_LYRICS.to_string()),
        ])
        .with_delay(Duration::from_millis(100));
        let requests = generator.request_handle();
        let capabilities = with_text(
            generator,
            ladder(vec![
                GenerationVariant::new("large", 800, 0),
                GenerationVariant::new("medium", 600, 0),
                GenerationVariant::new("small", 500, 0),
                GenerationVariant::new("tiny", 100, 0),
            ]),
        );

        let request = TextRequest::lyrics("Heat Waves", None);
        let (text, source) = capabilities
            .generate_text(&request)
            .await
            .into_parts()
            .unwrap();

        assert_eq!(source, Source::Synthetic);
        assert_eq!(text.generated_by, crate::synthetic::SYNTHETIC_ENGINE);

        let budgets: Vec<u32> = requests
            .requests()
            .iter()
            .map(|(_, variant)| variant.max_tokens)
            .collect();
        assert_eq!(budgets.len(), 3);
        assert!(budgets.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[tokio::test]
    async fn permanent_error_stops_generation() {
        let generator = MockTextGenerator::new(vec![
            Err(ProviderError::Auth("invalid key".into())),
            Ok(LONG_LYRICS.to_string()),
        ]);
        let requests = generator.request_handle();
        let capabilities = with_text(generator, default_ladder());

        let result = capabilities
            .generate_text(&TextRequest::analysis("Flowers", Some("Miley Cyrus".into())))
            .await;
        assert_eq!(result.source(), Some(Source::Synthetic));
        assert_eq!(requests.request_count(), 1);
    }

    #[tokio::test]
    async fn short_answer_moves_to_next_variant_with_simpler_prompt() {
        let generator = MockTextGenerator::new(vec![
            Ok("la la".to_string()),
            Ok(LONG_LYRICS.to_string()),
        ]);
        let requests = generator.request_handle();
        let capabilities = with_text(generator, default_ladder());

        let request = TextRequest::lyrics("Midnight Train", Some("Glass Animals".into()));
        let (text, source) = capabilities
            .generate_text(&request)
            .await
            .into_parts()
            .unwrap();
        assert_eq!(source, Source::Live);
        assert_eq!(text.generated_by, "AI (medium)");

        let recorded = requests.requests();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].0, request.prompt(0));
        assert_eq!(recorded[1].0, request.prompt(1));
    }

    #[tokio::test]
    async fn placeholder_credentials_never_reach_the_network() {
        let settings = ChatSettings::from_lookup(|key| {
            Some(match key {
                "SPOTIFY_CLIENT_ID" => "your_client_id_here".to_string(),
                "SPOTIFY_CLIENT_SECRET" => "changeme".to_string(),
                "OPENAI_API_KEY" => String::new(),
                // Unroutable; any request would fail loudly.
                _ => "http://127.0.0.1:9".to_string(),
            })
        });
        let capabilities = Capabilities::from_settings(&settings).unwrap();
        capabilities.bring_up().await;

        for handle in [
            capabilities.music().state().describe(),
            capabilities.text().state().describe(),
        ] {
            assert!(handle.starts_with("unavailable, last failure credentials:"), "{handle}");
        }

        let (tracks, source) = capabilities.fetch_trending(3, None).await.into_parts().unwrap();
        assert_eq!(source, Source::Synthetic);
        assert_eq!(tracks.len(), 3);
    }

    #[test]
    fn or_synthetic_keeps_success() {
        let live = CapabilityResult::live(1).or_synthetic("test", || 2);
        assert_eq!(live.into_parts().unwrap(), (1, Source::Live));

        let fallback = CapabilityResult::Failure(ProviderError::Timeout).or_synthetic("test", || 2);
        assert_eq!(fallback.into_parts().unwrap(), (2, Source::Synthetic));
    }
}
