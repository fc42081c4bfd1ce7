//! Preflight credential checks.
//!
//! These run before bring-up so that missing or placeholder credentials
//! mark a provider unavailable without any network call.

use crate::provider::music::MusicCredentials;
use crate::provider::text::TextCredentials;
use crate::provider::{ProviderError, ProviderKind};
use crate::utils::settings::{
    ChatSettings, OPENAI_API_KEY, SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET,
};

/// Whether a credential value is empty or an obvious template value.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value.is_empty()
        || value.starts_with("your_")
        || value.starts_with("your-")
        || value.ends_with("_here")
        || value == "changeme"
        || value.contains("placeholder")
        || value.starts_with("xxx")
}

/// Returns the trimmed value of a credential that is set and real.
fn require(key: &str, value: Option<&str>) -> Result<String, ProviderError> {
    match value {
        None => Err(ProviderError::ConfigMissing(format!("{key} is not set"))),
        Some(value) if is_placeholder(value) => Err(ProviderError::ConfigMissing(format!(
            "{key} is empty or a placeholder"
        ))),
        Some(value) => Ok(value.trim().to_string()),
    }
}

/// Validates the music catalog client-credentials pair.
pub fn check_music_credentials(settings: &ChatSettings) -> Result<MusicCredentials, ProviderError> {
    Ok(MusicCredentials {
        client_id: require(SPOTIFY_CLIENT_ID, settings.spotify_client_id.as_deref())?,
        client_secret: require(SPOTIFY_CLIENT_SECRET, settings.spotify_client_secret.as_deref())?,
    })
}

/// Validates the text generation API key.
pub fn check_text_credentials(settings: &ChatSettings) -> Result<TextCredentials, ProviderError> {
    Ok(TextCredentials {
        api_key: require(OPENAI_API_KEY, settings.openai_api_key.as_deref())?,
    })
}

/// Credential status of every provider, for status output.
pub fn credential_report(settings: &ChatSettings) -> Vec<(ProviderKind, Result<(), ProviderError>)> {
    vec![
        (
            ProviderKind::MusicCatalog,
            check_music_credentials(settings).map(|_| ()),
        ),
        (
            ProviderKind::TextGeneration,
            check_text_credentials(settings).map(|_| ()),
        ),
    ]
}
