//! Provider error taxonomy.

use thiserror::Error;

/// Coarse failure classes that drive retry and fallback decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    /// Credentials absent or placeholders; no network call is made.
    ConfigMissing,
    /// Timeout, rate limit or transport failure; worth another attempt.
    Transient,
    /// Rejected credentials or a malformed request; retrying cannot help.
    Permanent,
    /// The call succeeded on the wire but the payload is unusable.
    MalformedResponse,
}

/// Errors raised by provider clients and bring-up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credentials not configured or still set to a placeholder.
    #[error("Credentials missing or placeholder: {0}")]
    ConfigMissing(String),

    /// The client object could not be built for a configuration.
    #[error("Failed to construct client: {0}")]
    Construction(String),

    /// The call exceeded its per-attempt timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provider asked us to slow down.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Network or server-side failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider rejected our credentials.
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// The provider rejected the request itself.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Empty, too short or ill-shaped payload.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Maps this error onto its failure class.
    pub fn class(&self) -> FailureClass {
        match self {
            Self::ConfigMissing(_) => FailureClass::ConfigMissing,
            Self::Construction(_) | Self::Timeout | Self::RateLimited | Self::Transport(_) => {
                FailureClass::Transient
            }
            Self::Auth(_) | Self::InvalidRequest(_) => FailureClass::Permanent,
            Self::MalformedResponse(_) => FailureClass::MalformedResponse,
        }
    }

    /// Whether another variant may succeed where this attempt failed.
    ///
    /// Malformed payloads count as recoverable: a smaller model often
    /// answers where a larger one returned nothing useful.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.class(),
            FailureClass::Transient | FailureClass::MalformedResponse
        )
    }

    /// Classifies an HTTP status code returned by a provider.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = format!("HTTP {status}: {body}");
        match status {
            401 | 403 => Self::Auth(detail),
            408 | 504 => Self::Timeout,
            429 => Self::RateLimited,
            400..=499 => Self::InvalidRequest(detail),
            _ => Self::Transport(detail),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::Construction(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
