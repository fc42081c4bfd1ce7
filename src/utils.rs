//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{check_music_credentials, check_text_credentials, is_placeholder};
pub use settings::{ChatSettings, Settings};
