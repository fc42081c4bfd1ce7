//! Provider connection ladders and generation variants.
//!
//! The ladders are loaded from an embedded YAML template so the bring-up
//! order and the generation budgets live in one reviewable place.

use std::sync::OnceLock;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Upper bound on the pause between two bring-up attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// Hard cap on live generation attempts per request.
pub const MAX_GENERATION_ATTEMPTS: usize = 3;

/// Errors found while validating the embedded profiles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// The YAML template could not be parsed.
    #[error("Failed to parse provider profiles: {0}")]
    Parse(String),

    /// A ladder has no entries.
    #[error("Provider ladder '{0}' is empty")]
    EmptyLadder(String),

    /// Generation budgets must shrink from one variant to the next.
    #[error("Generation variant '{model}' asks for {max_tokens} tokens, not fewer than the previous {previous}")]
    BudgetNotShrinking {
        /// Offending model.
        model: String,
        /// Its token budget.
        max_tokens: u32,
        /// Budget of the variant before it.
        previous: u32,
    },
}

/// One candidate connection configuration for a provider.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Identifier used in logs and status output.
    pub name: String,
    /// Request timeout for the client built from this configuration.
    pub timeout_secs: u64,
    /// Retries the client performs internally on transient failures.
    pub max_retries: u32,
    /// Model used for probing, when the provider has models.
    #[serde(default)]
    pub model: Option<String>,
    /// Build a new connection pool instead of reusing the shared one.
    #[serde(default)]
    pub fresh_session: bool,
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub relaxed_tls: bool,
}

impl ProviderConfig {
    /// Creates a configuration with default knobs.
    pub fn new(name: impl Into<String>, timeout_secs: u64, max_retries: u32) -> Self {
        Self {
            name: name.into(),
            timeout_secs,
            max_retries,
            model: None,
            fresh_session: false,
            relaxed_tls: false,
        }
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bring-up settings for one provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLadder {
    /// Timeout for the single probe call of each attempt.
    pub probe_timeout_ms: u64,
    /// Pause between failed attempts, clamped to [`MAX_BACKOFF`].
    pub backoff_ms: u64,
    /// Configurations in the order they are tried.
    pub ladder: Vec<ProviderConfig>,
}

impl ProviderLadder {
    /// Creates a ladder from its parts.
    pub fn new(configs: Vec<ProviderConfig>, probe_timeout: Duration, backoff: Duration) -> Self {
        Self {
            probe_timeout_ms: probe_timeout.as_millis() as u64,
            backoff_ms: backoff.as_millis() as u64,
            ladder: configs,
        }
    }

    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Backoff between attempts, never above [`MAX_BACKOFF`].
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms).min(MAX_BACKOFF)
    }
}

/// One model variant tried by text generation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GenerationVariant {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Per-attempt timeout.
    pub timeout_secs: u64,
}

impl GenerationVariant {
    /// Creates a variant.
    pub fn new(model: impl Into<String>, max_tokens: u32, timeout_secs: u64) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            timeout_secs,
        }
    }

    /// Per-attempt timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    delay_ms: u64,
    variants: Vec<GenerationVariant>,
}

/// Validated, budget-shrinking list of generation variants.
#[derive(Debug, Clone)]
pub struct GenerationLadder {
    variants: Vec<GenerationVariant>,
    delay: Duration,
}

impl GenerationLadder {
    /// Validates the variants and caps them at [`MAX_GENERATION_ATTEMPTS`].
    pub fn new(variants: Vec<GenerationVariant>, delay: Duration) -> Result<Self, ProfileError> {
        if variants.is_empty() {
            return Err(ProfileError::EmptyLadder("generation".to_string()));
        }

        for pair in variants.windows(2) {
            if pair[1].max_tokens >= pair[0].max_tokens {
                return Err(ProfileError::BudgetNotShrinking {
                    model: pair[1].model.clone(),
                    max_tokens: pair[1].max_tokens,
                    previous: pair[0].max_tokens,
                });
            }
        }

        let mut variants = variants;
        if variants.len() > MAX_GENERATION_ATTEMPTS {
            tracing::debug!(
                configured = variants.len(),
                cap = MAX_GENERATION_ATTEMPTS,
                "Truncating generation variants to attempt cap"
            );
            variants.truncate(MAX_GENERATION_ATTEMPTS);
        }

        Ok(Self {
            variants,
            delay: delay.min(MAX_BACKOFF),
        })
    }

    /// Variants in attempt order.
    pub fn variants(&self) -> &[GenerationVariant] {
        &self.variants
    }

    /// Fixed pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Debug, Deserialize)]
struct RawProfiles {
    music: ProviderLadder,
    text: ProviderLadder,
    generation: RawGeneration,
}

/// All provider profiles shipped with the binary.
#[derive(Debug, Clone)]
pub struct ProviderProfiles {
    /// Music catalog bring-up ladder.
    pub music: ProviderLadder,
    /// Text generation bring-up ladder.
    pub text: ProviderLadder,
    /// Variants used by generation requests.
    pub generation: GenerationLadder,
}

impl ProviderProfiles {
    /// Loads and validates the embedded profiles.
    pub fn load() -> Result<Self, ProfileError> {
        Self::from_yaml(include_str!("../templates/providers.yaml"))
    }

    /// Parses and validates profiles from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let raw: RawProfiles =
            serde_yaml::from_str(yaml).map_err(|e| ProfileError::Parse(e.to_string()))?;

        if raw.music.ladder.is_empty() {
            return Err(ProfileError::EmptyLadder("music".to_string()));
        }
        if raw.text.ladder.is_empty() {
            return Err(ProfileError::EmptyLadder("text".to_string()));
        }

        let generation = GenerationLadder::new(
            raw.generation.variants,
            Duration::from_millis(raw.generation.delay_ms),
        )?;

        Ok(Self {
            music: raw.music,
            text: raw.text,
            generation,
        })
    }
}

static PROVIDER_PROFILES: OnceLock<Result<ProviderProfiles, ProfileError>> = OnceLock::new();

/// Returns the process-wide provider profiles.
pub fn get_provider_profiles() -> Result<&'static ProviderProfiles, ProfileError> {
    PROVIDER_PROFILES
        .get_or_init(ProviderProfiles::load)
        .as_ref()
        .map_err(Clone::clone)
}
