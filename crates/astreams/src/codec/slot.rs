//! Value slot encoding/decoding.

use serde_json::Value;

use crate::codec::context::DecodeContext;
use crate::codec::entity::encode_entity;
use crate::codec::resolver::resolve_embedded;
use crate::codec::scalar::{decode_scalar, encode_scalar};
use crate::error::{DecodeError, EncodeError};
use crate::model::{Iri, Slot};
use crate::schema::PropertySchema;

/// Decodes one property value.
///
/// Representations are tried in declared order: scalar kinds, then IRI,
/// then capabilities. The first that succeeds wins. A scalar whose JSON kind
/// matched but whose content did not parse is an error only if nothing
/// later succeeds; a value matching nothing at all is kept as unknown.
pub fn decode_slot(
    raw: &Value,
    schema: &PropertySchema,
    ctx: &DecodeContext<'_>,
) -> Result<Slot, DecodeError> {
    let mut malformed = None;
    for kind in schema.scalars() {
        match decode_scalar(raw, *kind) {
            Ok(Some(scalar)) => return Ok(Slot::Scalar(scalar)),
            Ok(None) => {}
            Err(err) => {
                malformed.get_or_insert(err);
            }
        }
    }

    if schema.accepts_iri() {
        if let Some(iri) = raw.as_str().and_then(|s| Iri::parse(s).ok()) {
            return Ok(Slot::Reference(iri));
        }
    }

    if let Value::Object(object) = raw {
        if let Some(embedded) = resolve_embedded(object, schema.capabilities(), ctx)? {
            return Ok(Slot::Embedded(embedded));
        }
    }

    if let Some(err) = malformed {
        return Err(err);
    }
    tracing::debug!(property = schema.name(), "value matches no accepted representation, keeping as unknown");
    Ok(Slot::Unknown(raw.clone()))
}

/// Encodes one property value.
pub fn encode_slot(slot: &Slot) -> Result<Value, EncodeError> {
    match slot {
        Slot::Scalar(scalar) => encode_scalar(scalar),
        Slot::Reference(iri) => Ok(Value::String(iri.as_str().to_string())),
        Slot::Embedded(embedded) => encode_entity(embedded.entity()),
        Slot::Unknown(raw) => Ok(raw.clone()),
    }
}
