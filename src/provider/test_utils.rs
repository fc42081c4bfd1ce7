//! Shared test utilities for the `provider` module.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::text::GenerationPrompt;
use super::{
    BringUp, GenerationVariant, MusicCatalog, Probe, ProfileRecord, ProviderConfig, ProviderError,
    ProviderFuture, ProviderKind, ProviderLadder, TextGenerator, TrackRecord,
};

/// Builds a bring-up manager whose single configuration yields `client`.
pub(crate) fn connected<C: ?Sized + Probe + 'static>(
    kind: ProviderKind,
    client: Arc<C>,
) -> BringUp<C> {
    BringUp::new(
        kind,
        ProviderLadder::new(
            vec![ProviderConfig::new("mock", 5, 0)],
            Duration::from_secs(1),
            Duration::ZERO,
        ),
        Ok(()),
        move |_: &ProviderConfig| -> Result<Arc<C>, ProviderError> { Ok(Arc::clone(&client)) },
    )
}

/// Builds a well-formed track for tests.
pub(crate) fn sample_track(rank: Option<u32>, title: &str, artist: &str) -> TrackRecord {
    TrackRecord {
        rank,
        title: title.to_string(),
        artist: artist.to_string(),
        album: format!("{title} (Single)"),
        release_date: "2024-01-01".to_string(),
        popularity: 80,
        duration_ms: 180_000,
        url: format!("https://open.spotify.com/track/{}", title.to_lowercase()),
    }
}

/// Mock music catalog with fixed answers per operation.
///
/// Operations without a configured answer fail with
/// [`ProviderError::Transport`]. Every operation call is counted; use
/// [`call_handle`](Self::call_handle) to read the count after the mock
/// has been moved into a bring-up manager.
pub(crate) struct MockMusicCatalog {
    probe: Result<(), ProviderError>,
    probe_delay: Duration,
    call_delay: Duration,
    trending: Result<Vec<TrackRecord>, ProviderError>,
    search: Result<Vec<TrackRecord>, ProviderError>,
    profile: Result<Option<ProfileRecord>, ProviderError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockMusicCatalog {
    /// Creates a catalog whose probe succeeds and whose operations fail.
    pub(crate) fn new() -> Self {
        let unset = || ProviderError::Transport("no mock answer".to_string());
        Self {
            probe: Ok(()),
            probe_delay: Duration::ZERO,
            call_delay: Duration::ZERO,
            trending: Err(unset()),
            search: Err(unset()),
            profile: Err(unset()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the probe outcome.
    pub(crate) fn with_probe(mut self, probe: Result<(), ProviderError>) -> Self {
        self.probe = probe;
        self
    }

    /// Delays the probe answer.
    pub(crate) fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    /// Delays every operation answer.
    pub(crate) fn with_call_delay(mut self, delay: Duration) -> Self {
        self.call_delay = delay;
        self
    }

    /// Sets the trending answer.
    pub(crate) fn with_trending(mut self, result: Result<Vec<TrackRecord>, ProviderError>) -> Self {
        self.trending = result;
        self
    }

    /// Sets the search answer.
    pub(crate) fn with_search(mut self, result: Result<Vec<TrackRecord>, ProviderError>) -> Self {
        self.search = result;
        self
    }

    /// Sets the profile answer.
    pub(crate) fn with_profile(
        mut self,
        result: Result<Option<ProfileRecord>, ProviderError>,
    ) -> Self {
        self.profile = result;
        self
    }

    /// Returns a handle listing the operations called so far.
    pub(crate) fn call_handle(&self) -> CallRecordHandle {
        CallRecordHandle {
            calls: self.calls.clone(),
        }
    }

    fn answer<'a, T: Clone + Send + Sync + 'a>(
        &'a self,
        call: String,
        result: &'a Result<T, ProviderError>,
    ) -> ProviderFuture<'a, T> {
        self.calls.lock().unwrap().push(call);
        let delay = self.call_delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result.clone()
        })
    }
}

impl Probe for MockMusicCatalog {
    fn probe(&self) -> ProviderFuture<'_, ()> {
        let probe = self.probe.clone();
        let delay = self.probe_delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            probe
        })
    }
}

impl MusicCatalog for MockMusicCatalog {
    fn top_tracks<'a>(
        &'a self,
        region: &'a str,
        limit: usize,
    ) -> ProviderFuture<'a, Vec<TrackRecord>> {
        self.answer(format!("top_tracks {region} {limit}"), &self.trending)
    }

    fn search_tracks<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> ProviderFuture<'a, Vec<TrackRecord>> {
        self.answer(format!("search_tracks {query} {limit}"), &self.search)
    }

    fn artist_profile<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<ProfileRecord>> {
        self.answer(format!("artist_profile {name}"), &self.profile)
    }
}

/// Shared handle to a mock catalog's call log.
pub(crate) struct CallRecordHandle {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallRecordHandle {
    /// Returns every recorded call, oldest first.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the number of operation calls.
    pub(crate) fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Mock text generator with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// later calls fail with [`ProviderError::Transport`]. Every call records
/// the prompt and variant it received.
pub(crate) struct MockTextGenerator {
    probe: Result<(), ProviderError>,
    delay: Duration,
    responses: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    recorded: Arc<Mutex<Vec<(GenerationPrompt, GenerationVariant)>>>,
}

impl MockTextGenerator {
    /// Creates a generator that will return the given responses in order.
    pub(crate) fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            probe: Ok(()),
            delay: Duration::ZERO,
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the probe outcome.
    pub(crate) fn with_probe(mut self, probe: Result<(), ProviderError>) -> Self {
        self.probe = probe;
        self
    }

    /// Delays every generation answer.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns a handle for inspecting the requests sent to the mock.
    pub(crate) fn request_handle(&self) -> RequestRecordHandle {
        RequestRecordHandle {
            recorded: self.recorded.clone(),
        }
    }
}

/// Shared handle to a mock generator's recorded requests.
pub(crate) struct RequestRecordHandle {
    recorded: Arc<Mutex<Vec<(GenerationPrompt, GenerationVariant)>>>,
}

impl RequestRecordHandle {
    /// Returns every recorded `(prompt, variant)` pair.
    pub(crate) fn requests(&self) -> Vec<(GenerationPrompt, GenerationVariant)> {
        self.recorded.lock().unwrap().clone()
    }

    /// Returns the number of generation requests made.
    pub(crate) fn request_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }
}

impl Probe for MockTextGenerator {
    fn probe(&self) -> ProviderFuture<'_, ()> {
        let probe = self.probe.clone();
        Box::pin(async move { probe })
    }
}

impl TextGenerator for MockTextGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a GenerationPrompt,
        variant: &'a GenerationVariant,
    ) -> ProviderFuture<'a, String> {
        let responses = self.responses.clone();
        let recorded = self.recorded.clone();
        let entry = (prompt.clone(), variant.clone());
        let delay = self.delay;
        Box::pin(async move {
            recorded.lock().unwrap().push(entry);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Transport("no more mock responses".into())))
        })
    }
}
