//! # music-chat
//!
//! A chat front end over a music catalog and a text generation service.
//!
//! ## Features
//!
//! - Keyword intent routing with pattern-based entity extraction
//! - One-time provider bring-up across ordered connection ladders
//! - Deterministic synthetic fallback whenever a provider is degraded
//!
//! ## Quick Start
//!
//! ```no_run
//! use music_chat::{Capabilities, ChatRouter};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let capabilities = Capabilities::from_environment()?;
//! let router = ChatRouter::new(capabilities);
//! println!("{}", router.respond("What's trending?").await);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod chat;
pub mod cli;
pub mod facade;
pub mod provider;
pub mod synthetic;
pub mod utils;

pub use crate::chat::router::ChatRouter;
pub use crate::cli::Cli;
pub use crate::facade::{Capabilities, CapabilityResult, Source};

/// The current version of music-chat.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
