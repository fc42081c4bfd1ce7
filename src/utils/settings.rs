//! Settings and configuration utilities.
//!
//! Values are read from the environment first and fall back to
//! `$HOME/.music-chat/settings.json`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::provider::music::SpotifyEndpoints;
use crate::provider::text::DEFAULT_OPENAI_BASE;

/// Music catalog client id.
pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
/// Music catalog client secret.
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
/// Text generation API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Market used for trending lists.
pub const MUSIC_CHAT_REGION: &str = "MUSIC_CHAT_REGION";
/// Override for the catalog Web API base URL.
pub const SPOTIFY_API_BASE: &str = "SPOTIFY_API_BASE";
/// Override for the catalog accounts base URL.
pub const SPOTIFY_AUTH_BASE: &str = "SPOTIFY_AUTH_BASE";
/// Override for the text generation base URL.
pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "US";

/// Settings loaded from $HOME/.music-chat/settings.json.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path; a missing file yields empty settings.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".music-chat").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        env::var(key).ok().or_else(|| self.env.get(key).cloned())
    }
}

/// Everything the chat core needs from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Catalog client id, as configured.
    pub spotify_client_id: Option<String>,
    /// Catalog client secret, as configured.
    pub spotify_client_secret: Option<String>,
    /// Text generation API key, as configured.
    pub openai_api_key: Option<String>,
    /// Market for trending lists.
    pub region: String,
    /// Catalog service URLs.
    pub spotify: SpotifyEndpoints,
    /// Text generation base URL.
    pub openai_base: String,
}

impl ChatSettings {
    /// Reads settings from the environment and the settings file.
    pub fn load() -> Result<Self> {
        let settings = Settings::load()?;
        Ok(Self::from_lookup(|key| settings.get_env_var(key)))
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = SpotifyEndpoints::default();

        Self {
            spotify_client_id: lookup(SPOTIFY_CLIENT_ID),
            spotify_client_secret: lookup(SPOTIFY_CLIENT_SECRET),
            openai_api_key: lookup(OPENAI_API_KEY),
            region: non_empty(MUSIC_CHAT_REGION)
                .map_or_else(|| DEFAULT_REGION.to_string(), |r| r.trim().to_uppercase()),
            spotify: SpotifyEndpoints {
                api_base: non_empty(SPOTIFY_API_BASE).unwrap_or(defaults.api_base),
                auth_base: non_empty(SPOTIFY_AUTH_BASE).unwrap_or(defaults.auth_base),
            },
            openai_base: non_empty(OPENAI_API_BASE)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");

        let settings_json = r#"{
            "env": {
                "SPOTIFY_CLIENT_ID": "abc123",
                "MUSIC_CHAT_REGION": "gb"
            }
        }"#;
        fs::write(&settings_path, settings_json).unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();
        assert_eq!(settings.env.get("SPOTIFY_CLIENT_ID").unwrap(), "abc123");
        assert_eq!(settings.env.get("MUSIC_CHAT_REGION").unwrap(), "gb");
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();

        let err = Settings::load_from_path(&settings_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings file"));
    }

    #[test]
    fn settings_fallback_for_unset_variable() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(
            &settings_path,
            r#"{"env": {"MUSIC_CHAT_TEST_ONLY_KEY_7F3A": "from-file"}}"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();
        assert_eq!(
            settings.get_env_var("MUSIC_CHAT_TEST_ONLY_KEY_7F3A").as_deref(),
            Some("from-file")
        );
        assert_eq!(settings.get_env_var("MUSIC_CHAT_TEST_ONLY_MISSING_7F3A"), None);
    }

    #[test]
    fn chat_settings_defaults() {
        let settings = ChatSettings::from_lookup(|_| None);
        assert_eq!(settings.region, DEFAULT_REGION);
        assert_eq!(settings.spotify, SpotifyEndpoints::default());
        assert_eq!(settings.openai_base, DEFAULT_OPENAI_BASE);
        assert!(settings.openai_api_key.is_none());
    }

    #[test]
    fn chat_settings_overrides() {
        let values: HashMap<&str, &str> = [
            (MUSIC_CHAT_REGION, " se "),
            (SPOTIFY_API_BASE, "http://localhost:1"),
            (OPENAI_API_BASE, ""),
            (OPENAI_API_KEY, "sk-real"),
        ]
        .into_iter()
        .collect();

        let settings = ChatSettings::from_lookup(|key| values.get(key).map(|v| (*v).to_string()));
        assert_eq!(settings.region, "SE");
        assert_eq!(settings.spotify.api_base, "http://localhost:1");
        assert_eq!(settings.openai_base, DEFAULT_OPENAI_BASE);
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-real"));
    }
}
