//! # hearth-platform
//!
//! The boundary to the host smart-home platform.
//!
//! Defines the entity snapshot type, the traits the host implements
//! ([`EntitySource`], [`CommandExecutor`]), and the pure entity-refinement
//! layer: exclusion filtering and domain/location reranking.

#![deny(unsafe_code)]

pub mod refine;
pub mod snapshot;
pub mod traits;

pub use refine::{detect_location, filter_primary_entities, rerank};
pub use snapshot::{EntitySnapshot, document_for_entity, exposed_only};
pub use traits::{CommandExecutor, EntitySource, PlatformError};
