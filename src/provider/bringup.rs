//! One-time provider bring-up across an ordered configuration ladder.
//!
//! Each configuration is built, probed once under a short timeout, and the
//! first one that answers is committed for the lifetime of the process. When
//! every configuration fails the provider is marked unavailable and callers
//! run in degraded mode from then on.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{Probe, ProviderConfig, ProviderError, ProviderKind, ProviderLadder};

/// Name recorded for failures that happen before any configuration is tried.
pub const CREDENTIALS_STAGE: &str = "credentials";

/// Why one configuration of the ladder was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Configuration name, or [`CREDENTIALS_STAGE`].
    pub config: String,
    /// What went wrong.
    pub error: ProviderError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.config, self.error)
    }
}

/// Live connection state of a provider.
pub enum ProviderHandle<C: ?Sized> {
    /// Bring-up has not run yet.
    Unconnected,
    /// A configuration passed its probe and is fixed from now on.
    Connected {
        /// The committed configuration.
        config: ProviderConfig,
        /// Client built from it.
        client: Arc<C>,
    },
    /// Every configuration failed, or credentials were missing.
    Unavailable {
        /// One entry per rejected attempt, in ladder order.
        failures: Vec<AttemptFailure>,
    },
}

impl<C: ?Sized> ProviderHandle<C> {
    /// Returns the live client when connected.
    pub fn client(&self) -> Option<&Arc<C>> {
        match self {
            Self::Connected { client, .. } => Some(client),
            _ => None,
        }
    }

    /// Returns the committed configuration when connected.
    pub fn config(&self) -> Option<&ProviderConfig> {
        match self {
            Self::Connected { config, .. } => Some(config),
            _ => None,
        }
    }

    /// Whether a configuration has been committed.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Whether the provider is permanently degraded.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// One-line summary for status output.
    pub fn describe(&self) -> String {
        match self {
            Self::Unconnected => "not started".to_string(),
            Self::Connected { config, .. } => format!("connected ({})", config.name),
            Self::Unavailable { failures } => match failures.last() {
                Some(last) => format!("unavailable, last failure {last}"),
                None => "unavailable".to_string(),
            },
        }
    }
}

impl<C: ?Sized> Clone for ProviderHandle<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Unconnected => Self::Unconnected,
            Self::Connected { config, client } => Self::Connected {
                config: config.clone(),
                client: Arc::clone(client),
            },
            Self::Unavailable { failures } => Self::Unavailable {
                failures: failures.clone(),
            },
        }
    }
}

impl<C: ?Sized> fmt::Debug for ProviderHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconnected => f.write_str("Unconnected"),
            Self::Connected { config, .. } => f
                .debug_struct("Connected")
                .field("config", &config.name)
                .finish_non_exhaustive(),
            Self::Unavailable { failures } => f
                .debug_struct("Unavailable")
                .field("failures", failures)
                .finish(),
        }
    }
}

/// Builds a client for one configuration.
pub type Connector<C> =
    Box<dyn Fn(&ProviderConfig) -> Result<Arc<C>, ProviderError> + Send + Sync>;

/// Runs bring-up for one provider at most once.
pub struct BringUp<C: ?Sized> {
    kind: ProviderKind,
    ladder: ProviderLadder,
    credentials: Result<(), ProviderError>,
    connector: Connector<C>,
    handle: OnceCell<ProviderHandle<C>>,
}

impl<C: ?Sized + Probe> BringUp<C> {
    /// Creates a bring-up manager.
    ///
    /// `credentials` is the outcome of the credential check; an error there
    /// skips every network attempt.
    pub fn new<F>(
        kind: ProviderKind,
        ladder: ProviderLadder,
        credentials: Result<(), ProviderError>,
        connector: F,
    ) -> Self
    where
        F: Fn(&ProviderConfig) -> Result<Arc<C>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            kind,
            ladder,
            credentials,
            connector: Box::new(connector),
            handle: OnceCell::new(),
        }
    }

    /// Creates a manager that is already unavailable.
    pub fn disabled(kind: ProviderKind, reason: ProviderError) -> Self {
        Self {
            kind,
            ladder: ProviderLadder::new(Vec::new(), Duration::ZERO, Duration::ZERO),
            credentials: Err(reason.clone()),
            connector: Box::new(
                move |_: &ProviderConfig| -> Result<Arc<C>, ProviderError> { Err(reason.clone()) },
            ),
            handle: OnceCell::new(),
        }
    }

    /// Which provider this manager brings up.
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Returns the handle, running bring-up on first use.
    ///
    /// Concurrent callers wait on the same initialization.
    pub async fn handle(&self) -> &ProviderHandle<C> {
        self.handle.get_or_init(|| self.run()).await
    }

    /// Returns the current state without triggering bring-up.
    pub fn state(&self) -> ProviderHandle<C> {
        self.handle
            .get()
            .cloned()
            .unwrap_or(ProviderHandle::Unconnected)
    }

    async fn run(&self) -> ProviderHandle<C> {
        if let Err(reason) = &self.credentials {
            warn!(provider = %self.kind, error = %reason, "Skipping provider bring-up");
            return ProviderHandle::Unavailable {
                failures: vec![AttemptFailure {
                    config: CREDENTIALS_STAGE.to_string(),
                    error: reason.clone(),
                }],
            };
        }

        let configs = &self.ladder.ladder;
        let mut failures = Vec::with_capacity(configs.len());

        for (index, config) in configs.iter().enumerate() {
            info!(
                provider = %self.kind,
                config = %config.name,
                attempt = index + 1,
                total = configs.len(),
                "Trying provider configuration"
            );

            match self.attempt(config).await {
                Ok(client) => {
                    info!(provider = %self.kind, config = %config.name, "Provider connected");
                    return ProviderHandle::Connected {
                        config: config.clone(),
                        client,
                    };
                }
                Err(error) => {
                    warn!(
                        provider = %self.kind,
                        config = %config.name,
                        error = %error,
                        "Provider configuration failed"
                    );
                    failures.push(AttemptFailure {
                        config: config.name.clone(),
                        error,
                    });
                }
            }

            let backoff = self.ladder.backoff();
            if index + 1 < configs.len() && !backoff.is_zero() {
                debug!(provider = %self.kind, ?backoff, "Backing off before next configuration");
                tokio::time::sleep(backoff).await;
            }
        }

        warn!(
            provider = %self.kind,
            attempts = failures.len(),
            "All provider configurations failed, using synthetic fallback"
        );
        ProviderHandle::Unavailable { failures }
    }

    async fn attempt(&self, config: &ProviderConfig) -> Result<Arc<C>, ProviderError> {
        let client = (self.connector)(config)?;

        match tokio::time::timeout(self.ladder.probe_timeout(), client.probe()).await {
            Ok(Ok(())) => Ok(client),
            Ok(Err(error)) => Err(error),
            Err(_) => Err(ProviderError::Timeout),
        }
    }
}
