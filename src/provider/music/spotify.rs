//! Spotify Web API catalog client.

use std::time::{Duration, Instant};

use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use super::{AlbumSummary, MusicCatalog, ProfileRecord, TrackRecord, UNKNOWN_FIELD};
use crate::provider::{FailureClass, Probe, ProviderConfig, ProviderError, ProviderFuture};

/// Default Web API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com";

/// Default accounts service base URL.
pub const DEFAULT_AUTH_BASE: &str = "https://accounts.spotify.com";

/// Playlist searched for when the region has no featured playlist.
const FALLBACK_PLAYLIST_QUERY: &str = "Top 50 Global";

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Client-credentials pair for the catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MusicCredentials {
    /// Application client id.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
}

/// Base URLs of the two Spotify services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpotifyEndpoints {
    /// Web API base URL.
    pub api_base: String,
    /// Accounts service base URL.
    pub auth_base: String,
}

impl Default for SpotifyEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct Paging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<Paging<SpotifyTrack>>,
    artists: Option<Paging<SpotifyArtist>>,
    playlists: Option<Paging<Option<PlaylistRef>>>,
}

#[derive(Deserialize)]
struct FeaturedPlaylists {
    playlists: Paging<Option<PlaylistRef>>,
}

#[derive(Deserialize)]
struct PlaylistRef {
    id: String,
}

#[derive(Deserialize)]
struct PlaylistItem {
    track: Option<SpotifyTrack>,
}

#[derive(Deserialize)]
struct ArtistRef {
    name: String,
}

#[derive(Deserialize)]
struct AlbumRef {
    name: Option<String>,
    release_date: Option<String>,
}

#[derive(Deserialize, Default)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Deserialize)]
struct SpotifyTrack {
    name: Option<String>,
    #[serde(default)]
    artists: Vec<ArtistRef>,
    album: Option<AlbumRef>,
    duration_ms: Option<u64>,
    popularity: Option<u8>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

impl SpotifyTrack {
    /// Converts to a record, dropping tracks without a title.
    fn into_record(self, rank: Option<u32>) -> Option<TrackRecord> {
        let title = self.name.filter(|name| !name.trim().is_empty())?;
        let artist = self
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let (album, release_date) = match self.album {
            Some(album) => (album.name, album.release_date),
            None => (None, None),
        };

        Some(TrackRecord {
            rank,
            title,
            artist,
            album: album.unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            release_date: release_date.unwrap_or_default(),
            popularity: self.popularity.unwrap_or(0),
            duration_ms: self.duration_ms.unwrap_or(0),
            url: self
                .external_urls
                .spotify
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        })
    }
}

#[derive(Deserialize)]
struct Followers {
    total: Option<u64>,
}

#[derive(Deserialize)]
struct SpotifyArtist {
    id: String,
    name: String,
    followers: Option<Followers>,
    popularity: Option<u8>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Deserialize)]
struct TopTracks {
    #[serde(default)]
    tracks: Vec<SpotifyTrack>,
}

#[derive(Deserialize)]
struct SpotifyAlbum {
    name: String,
    #[serde(default)]
    release_date: String,
    #[serde(default)]
    total_tracks: u32,
}

/// Catalog client using the client-credentials flow.
pub struct SpotifyCatalog {
    client: Client,
    credentials: MusicCredentials,
    endpoints: SpotifyEndpoints,
    max_retries: u32,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyCatalog {
    /// Builds a client for one bring-up configuration.
    pub fn connect(
        credentials: MusicCredentials,
        endpoints: SpotifyEndpoints,
        config: &ProviderConfig,
    ) -> Result<Self, ProviderError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if config.fresh_session {
            builder = builder.pool_max_idle_per_host(0);
        }
        if config.relaxed_tls {
            warn!(config = %config.name, "TLS certificate verification disabled for music catalog");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::Construction(e.to_string()))?;

        debug!(
            config = %config.name,
            api_base = %endpoints.api_base,
            max_retries = config.max_retries,
            "Built music catalog client"
        );

        Ok(Self {
            client,
            credentials,
            endpoints,
            max_retries: config.max_retries,
            token: Mutex::new(None),
        })
    }

    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let base = self.endpoints.api_base.trim_end_matches('/');
        Url::parse_with_params(&format!("{base}{path}"), params)
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let basic = base64::engine::general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        ));
        let url = format!(
            "{}/api/token",
            self.endpoints.auth_base.trim_end_matches('/')
        );

        debug!(url = %url, "Requesting catalog access token");
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Basic {basic}"))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;
        if token.access_token.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty access token".to_string(),
            ));
        }

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.get_json_once(url.clone()).await {
                Err(error)
                    if error.class() == FailureClass::Transient && attempt < self.max_retries =>
                {
                    attempt += 1;
                    debug!(url = %url, attempt, error = %error, "Retrying catalog request");
                }
                other => return other,
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let token = self.access_token().await?;
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 401 {
                // Expired or revoked token; fetch a new one next time.
                *self.token.lock().await = None;
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    async fn search(
        &self,
        query: &str,
        kind: &str,
        limit: usize,
    ) -> Result<SearchResponse, ProviderError> {
        let limit = limit.to_string();
        let url = self.api_url(
            "/v1/search",
            &[("q", query), ("type", kind), ("limit", limit.as_str())],
        )?;
        self.get_json(url).await
    }

    async fn trending_playlist(&self, region: &str) -> Result<String, ProviderError> {
        let url = self.api_url(
            "/v1/browse/featured-playlists",
            &[("country", region), ("limit", "1")],
        )?;

        match self.get_json::<FeaturedPlaylists>(url).await {
            Ok(featured) => {
                if let Some(playlist) = featured.playlists.items.into_iter().flatten().next() {
                    return Ok(playlist.id);
                }
                debug!(region = %region, "No featured playlist for region");
            }
            Err(error) if error.class() == FailureClass::Permanent => {
                if matches!(error, ProviderError::Auth(_)) {
                    return Err(error);
                }
                debug!(error = %error, "Featured playlists unavailable, searching instead");
            }
            Err(error) => return Err(error),
        }

        self.search(FALLBACK_PLAYLIST_QUERY, "playlist", 1)
            .await?
            .playlists
            .and_then(|page| page.items.into_iter().flatten().next())
            .map(|playlist| playlist.id)
            .ok_or_else(|| ProviderError::MalformedResponse("no trending playlist found".to_string()))
    }

    async fn fetch_top_tracks(
        &self,
        region: &str,
        limit: usize,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        let playlist_id = self.trending_playlist(region).await?;
        let limit_param = limit.to_string();
        let url = self.api_url(
            &format!("/v1/playlists/{playlist_id}/tracks"),
            &[("limit", limit_param.as_str())],
        )?;
        let page: Paging<PlaylistItem> = self.get_json(url).await?;

        let tracks: Vec<TrackRecord> = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(|track| track.into_record(None))
            .take(limit)
            .enumerate()
            .map(|(index, mut record)| {
                record.rank = Some(index as u32 + 1);
                record
            })
            .collect();

        info!(count = tracks.len(), region = %region, "Fetched trending tracks");
        Ok(tracks)
    }

    async fn fetch_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        let tracks: Vec<TrackRecord> = self
            .search(query, "track", limit)
            .await?
            .tracks
            .map(|page| page.items)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|track| track.into_record(None))
            .collect();

        info!(count = tracks.len(), query = %query, "Catalog search finished");
        Ok(tracks)
    }

    async fn fetch_profile(&self, name: &str) -> Result<Option<ProfileRecord>, ProviderError> {
        let Some(artist) = self
            .search(name, "artist", 1)
            .await?
            .artists
            .and_then(|page| page.items.into_iter().next())
        else {
            debug!(artist = %name, "Artist not found in catalog");
            return Ok(None);
        };

        let top_url = self.api_url(
            &format!("/v1/artists/{}/top-tracks", artist.id),
            &[("market", "US")],
        )?;
        let top: TopTracks = self.get_json(top_url).await?;

        let albums_url = self.api_url(
            &format!("/v1/artists/{}/albums", artist.id),
            &[("include_groups", "album"), ("limit", "5")],
        )?;
        let albums: Paging<SpotifyAlbum> = self.get_json(albums_url).await?;

        info!(artist = %artist.name, "Fetched artist profile");
        Ok(Some(ProfileRecord {
            name: artist.name,
            followers: artist.followers.and_then(|f| f.total).unwrap_or(0),
            popularity: artist.popularity.unwrap_or(0),
            genres: artist.genres,
            url: artist
                .external_urls
                .spotify
                .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
            top_tracks: top
                .tracks
                .into_iter()
                .filter_map(|track| track.into_record(None))
                .take(5)
                .collect(),
            albums: albums
                .items
                .into_iter()
                .map(|album| AlbumSummary {
                    name: album.name,
                    release_date: album.release_date,
                    total_tracks: album.total_tracks,
                })
                .collect(),
        }))
    }
}

impl Probe for SpotifyCatalog {
    fn probe(&self) -> ProviderFuture<'_, ()> {
        Box::pin(async move {
            let found = self
                .search("test", "track", 1)
                .await?
                .tracks
                .is_some_and(|page| !page.items.is_empty());
            if found {
                Ok(())
            } else {
                Err(ProviderError::MalformedResponse(
                    "probe search returned no tracks".to_string(),
                ))
            }
        })
    }
}

impl MusicCatalog for SpotifyCatalog {
    fn top_tracks<'a>(
        &'a self,
        region: &'a str,
        limit: usize,
    ) -> ProviderFuture<'a, Vec<TrackRecord>> {
        Box::pin(self.fetch_top_tracks(region, limit))
    }

    fn search_tracks<'a>(
        &'a self,
        query: &'a str,
        limit: usize,
    ) -> ProviderFuture<'a, Vec<TrackRecord>> {
        Box::pin(self.fetch_search(query, limit))
    }

    fn artist_profile<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<ProfileRecord>> {
        Box::pin(self.fetch_profile(name))
    }
}
