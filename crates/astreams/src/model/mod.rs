//! Data model types.
//!
//! This module contains the in-memory form of vocabulary documents:
//! - IRIs (identifiers and references)
//! - Scalars (typed primitive values)
//! - Slots (one decoded property value)
//! - Properties and natural-language maps
//! - Entities (one document) and their builder

pub mod builder;
pub mod entity;
pub mod iri;
pub mod lang_map;
pub mod property;
pub mod scalar;
pub mod slot;

pub use builder::EntityBuilder;
pub use entity::Entity;
pub use iri::{Iri, IriParseError};
pub use lang_map::LanguageMap;
pub use property::Property;
pub use scalar::{DateTime, Duration, Scalar};
pub use slot::{Embedded, Slot};
