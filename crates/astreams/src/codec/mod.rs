//! JSON encoding/decoding for vocabulary documents.
//!
//! Decoding runs entity → property → slot → resolver, recursing into the
//! entity codec for embedded objects. Encoding mirrors it.

pub mod context;
pub mod entity;
pub mod property;
pub mod resolver;
pub mod scalar;
pub mod slot;

pub use context::{DecodeContext, DecodeOptions};
pub use entity::{
    decode_as, decode_as_with_options, decode_entity, decode_entity_str,
    decode_entity_with_options, encode_entity, encode_entity_string,
};
pub use property::{decode_language_map, decode_property, encode_property};
pub use resolver::resolve_embedded;
pub use scalar::{decode_scalar, encode_scalar};
pub use slot::{decode_slot, encode_slot};
