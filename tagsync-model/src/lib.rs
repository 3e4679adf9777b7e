//! Core data model definitions shared across tagsync crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod media;
pub mod tag;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::TagId;
pub use media::{
    Gallery, MarkerPayload, MediaKind, MediaRef, MediaUpdate, Performer,
    Scene, SceneMarker,
};
pub use tag::{CanonicalTag, LocalTag, TagRef};
