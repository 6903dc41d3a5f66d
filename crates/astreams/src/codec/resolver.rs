//! Embedded object resolution.
//!
//! An object's `type` names are matched against the capabilities a property
//! accepts: capabilities in declared order, then names in document order.
//! The first pair the registry knows wins.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::context::DecodeContext;
use crate::codec::entity::decode_fields;
use crate::error::DecodeError;
use crate::model::{Embedded, Entity};
use crate::schema::Capability;

/// The string names of a `type` value: one string, or the strings of an array.
pub(crate) fn type_candidates(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Resolves `object` as one of `capabilities` and decodes it.
///
/// Returns `Ok(None)` if no `type` name implements any accepted capability.
/// Once a name matches, decode failures are errors, not a fallback.
pub fn resolve_embedded(
    object: &Map<String, Value>,
    capabilities: &[Capability],
    ctx: &DecodeContext<'_>,
) -> Result<Option<Embedded>, DecodeError> {
    let candidates = type_candidates(object.get("type"));
    if candidates.is_empty() {
        return Ok(None);
    }

    for &capability in capabilities {
        for name in &candidates {
            let Some(term) = ctx.registry().resolve(name, capability) else {
                continue;
            };
            tracing::trace!(type_name = %name, %capability, depth = ctx.depth(), "resolved embedded object");

            let nested = ctx.nested()?;
            let mut entity = Entity::new(Arc::clone(term));
            decode_fields(&mut entity, object, &nested).map_err(|source| {
                DecodeError::MalformedEmbedded {
                    type_name: name.to_string(),
                    source: Box::new(source),
                }
            })?;
            return Ok(Some(Embedded::resolved(capability, entity)));
        }
    }

    Ok(None)
}
