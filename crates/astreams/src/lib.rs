//! astreams: polymorphic property codec and type registry for
//! ActivityStreams-style JSON-LD vocabularies.
//!
//! Properties in these vocabularies are polymorphic: one key may hold a
//! scalar, an IRI, an embedded object of one of several kinds, or an array
//! of any of these. This crate decodes such documents into typed slots and
//! back, driven entirely by declarative per-term schemas.
//!
//! # Overview
//!
//! - **Schema-driven**: each property declares its cardinality, its accepted
//!   representations in precedence order and whether it has a `<name>Map`
//! - **Open-world**: unrecognized keys, type names and values survive a
//!   decode/encode round trip unchanged
//! - **Strict where it matters**: recognized data that fails to parse is an
//!   error, never silently downgraded
//!
//! # Quick Start
//!
//! ```rust
//! use astreams::{decode_entity, encode_entity, TypeRegistry};
//! use serde_json::json;
//!
//! let registry = TypeRegistry::activity_streams();
//! let doc = json!({
//!     "@context": "https://www.w3.org/ns/activitystreams",
//!     "type": "Create",
//!     "actor": "https://example.com/users/alice",
//!     "object": {"type": "Note", "content": "Hello", "contentMap": {"fr": "Bonjour"}},
//!     "toot:discoverable": true
//! });
//!
//! let create = decode_entity(&doc, registry).unwrap();
//! let note = create.first("object").unwrap().as_embedded().unwrap().entity();
//! assert_eq!(note.language_map("content").unwrap().get("fr"), Some("Bonjour"));
//!
//! // Unknown keys come back; @context does not
//! let encoded = encode_entity(&create).unwrap();
//! assert_eq!(encoded["toot:discoverable"], json!(true));
//! assert!(encoded.get("@context").is_none());
//! ```
//!
//! # Modules
//!
//! - [`model`]: In-memory types (Entity, Slot, Scalar, Iri, LanguageMap)
//! - [`schema`]: Declarative property and term schemas, and the ActivityStreams vocabulary
//! - [`registry`]: Type registry resolving names to capability-tagged terms
//! - [`codec`]: JSON encoding/decoding
//! - [`dispatch`]: Routing decoded entities to handlers by type
//! - [`error`]: Error types
//! - [`limits`]: Limits applied while decoding
//!
//! # Security
//!
//! Decoding untrusted input never panics. Embedding depth is bounded by
//! [`DecodeOptions::max_depth`], defaulting to [`limits::MAX_NESTING_DEPTH`].

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod limits;
pub mod model;
pub mod registry;
pub mod schema;
pub mod util;

// Re-export commonly used types at crate root
pub use codec::{
    decode_as, decode_as_with_options, decode_entity, decode_entity_str,
    decode_entity_with_options, encode_entity, encode_entity_string, DecodeOptions,
};
pub use dispatch::{DispatchError, Dispatcher};
pub use error::{DecodeError, EncodeError, ErrorCode, PropertyError, RegistryError};
pub use model::{
    DateTime, Duration, Embedded, Entity, EntityBuilder, Iri, LanguageMap, Property, Scalar, Slot,
};
pub use registry::{RegistryBuilder, Term, TypeRegistry};
pub use schema::{Capability, CapabilitySet, PropertySchema, ScalarKind, TermSchema};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
