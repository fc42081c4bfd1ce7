//! External provider clients and their one-time bring-up.

pub mod bringup;
pub mod error;
pub mod music;
pub mod profiles;
pub mod text;

#[cfg(test)]
pub(crate) mod test_utils;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

pub use bringup::{AttemptFailure, BringUp, ProviderHandle};
pub use error::{FailureClass, ProviderError};
pub use music::{MusicCatalog, ProfileRecord, TrackRecord};
pub use profiles::{
    get_provider_profiles, GenerationLadder, GenerationVariant, ProviderConfig, ProviderLadder,
};
pub use text::{GeneratedText, GenerationPrompt, Style, TextGenerator, TextKind, TextRequest};

/// Boxed future returned by provider calls.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// The external systems the chat core talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Music metadata catalog.
    MusicCatalog,
    /// Generative text service.
    TextGeneration,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MusicCatalog => write!(f, "music catalog"),
            Self::TextGeneration => write!(f, "text generation"),
        }
    }
}

/// A client that can verify its connection with one cheap call.
pub trait Probe: Send + Sync {
    /// Issues a side-effect-free request and checks the answer is sane.
    fn probe(&self) -> ProviderFuture<'_, ()>;
}
