//! Chat front end: intent classification, entity extraction and routing.

pub mod entities;
pub mod format;
pub mod intent;
pub mod router;

pub use entities::{extract, EntityKind, ExtractedEntities};
pub use intent::{classify, Intent};
pub use router::{ChatRouter, Reply};
