//! Entity encoding/decoding: whole documents.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::context::{DecodeContext, DecodeOptions};
use crate::codec::property::{decode_language_map, decode_property, encode_property};
use crate::codec::resolver::type_candidates;
use crate::error::{DecodeError, EncodeError};
use crate::model::{Entity, Iri};
use crate::registry::{KeyRole, Term, TypeRegistry};

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a document as the first of its `type` names the registry knows.
pub fn decode_entity(doc: &Value, registry: &TypeRegistry) -> Result<Entity, DecodeError> {
    decode_entity_with_options(doc, registry, DecodeOptions::default())
}

/// Decodes a document with the given options.
pub fn decode_entity_with_options(
    doc: &Value,
    registry: &TypeRegistry,
    options: DecodeOptions,
) -> Result<Entity, DecodeError> {
    let object = as_object(doc)?;
    let candidates = type_candidates(object.get("type"));
    let term = candidates
        .iter()
        .find_map(|name| registry.get(name))
        .ok_or_else(|| DecodeError::UnhandledType {
            types: candidates.iter().map(|name| name.to_string()).collect(),
        })?;
    decode_with_term(object, term, &DecodeContext::new(registry, options))
}

/// Decodes a document as `type_name`, whatever its `type` key says.
///
/// The `type` list is still kept as received.
pub fn decode_as(doc: &Value, registry: &TypeRegistry, type_name: &str) -> Result<Entity, DecodeError> {
    decode_as_with_options(doc, registry, type_name, DecodeOptions::default())
}

/// Decodes a document as `type_name` with the given options.
pub fn decode_as_with_options(
    doc: &Value,
    registry: &TypeRegistry,
    type_name: &str,
    options: DecodeOptions,
) -> Result<Entity, DecodeError> {
    let object = as_object(doc)?;
    let term = registry.get(type_name).ok_or_else(|| DecodeError::UnhandledType {
        types: vec![type_name.to_string()],
    })?;
    decode_with_term(object, term, &DecodeContext::new(registry, options))
}

/// Parses JSON text and decodes it.
pub fn decode_entity_str(json: &str, registry: &TypeRegistry) -> Result<Entity, DecodeError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    decode_entity(&doc, registry)
}

fn as_object(doc: &Value) -> Result<&Map<String, Value>, DecodeError> {
    doc.as_object().ok_or(DecodeError::NotAnObject { found: json_kind(doc) })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_with_term(
    object: &Map<String, Value>,
    term: &Arc<Term>,
    ctx: &DecodeContext<'_>,
) -> Result<Entity, DecodeError> {
    let mut entity = Entity::new(Arc::clone(term));
    decode_fields(&mut entity, object, ctx)?;
    Ok(entity)
}

/// Fills `entity` from the keys of `object`.
///
/// Declared keys go to their property codec, `id` and `type` to the entity,
/// `@context` is ignored and everything else becomes an extension.
pub(crate) fn decode_fields(
    entity: &mut Entity,
    object: &Map<String, Value>,
    ctx: &DecodeContext<'_>,
) -> Result<(), DecodeError> {
    let term = Arc::clone(entity.term());
    for (key, value) in object {
        match key.as_str() {
            "@context" => continue,
            "id" => {
                let id = value
                    .as_str()
                    .and_then(|s| Iri::parse(s).ok())
                    .ok_or_else(|| DecodeError::MalformedId { value: value.to_string() })?;
                entity.set_id(Some(id));
                continue;
            }
            "type" => {
                *entity.types_mut() = match value {
                    Value::Array(items) => items.clone(),
                    other => vec![other.clone()],
                };
                continue;
            }
            _ => {}
        }

        match term.lookup_key(key) {
            Some((index, KeyRole::Value)) => {
                let schema = &term.properties()[index];
                let slots = decode_property(value, schema, ctx)
                    .map_err(|source| DecodeError::in_property(key, source))?;
                entity.property_at_mut(index).slots = slots;
            }
            Some((index, KeyRole::LanguageMap)) => match value.as_object() {
                Some(map) => {
                    let map = decode_language_map(term.properties()[index].name(), map);
                    entity.property_at_mut(index).language_map = Some(map);
                }
                None => {
                    tracing::debug!(key = key.as_str(), "language map is not an object, keeping as extension");
                    entity.extensions_mut().insert(key.clone(), value.clone());
                }
            },
            None => {
                tracing::debug!(key = key.as_str(), type_name = term.name(), "undeclared key kept as extension");
                entity.extensions_mut().insert(key.clone(), value.clone());
            }
        }
    }
    Ok(())
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes an entity as a JSON object.
///
/// The term's own name is added to `type` if missing. Any nested failure
/// aborts the whole encode.
pub fn encode_entity(entity: &Entity) -> Result<Value, EncodeError> {
    let mut out = Map::new();

    if let Some(id) = entity.id() {
        out.insert("id".to_string(), Value::String(id.as_str().to_string()));
    }

    let mut types = entity.types().to_vec();
    if !entity.type_names().any(|name| name == entity.type_name()) {
        types.push(Value::String(entity.type_name().to_string()));
    }
    let types = match types.len() {
        1 => types.swap_remove(0),
        _ => Value::Array(types),
    };
    out.insert("type".to_string(), types);

    for (index, schema) in entity.term().properties().iter().enumerate() {
        encode_property(schema, entity.property_at(index), &mut out)
            .map_err(|source| EncodeError::in_property(schema.name(), source))?;
    }

    // Declared keys take precedence over extensions with the same name
    for (key, value) in entity.extensions() {
        if !out.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }

    Ok(Value::Object(out))
}

/// Encodes an entity as compact JSON text.
pub fn encode_entity_string(entity: &Entity) -> Result<String, EncodeError> {
    encode_entity(entity).map(|value| value.to_string())
}
