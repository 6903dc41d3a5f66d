//! Property encoding/decoding: cardinality and natural-language maps.

use serde_json::{Map, Value};

use crate::codec::context::DecodeContext;
use crate::codec::slot::{decode_slot, encode_slot};
use crate::error::{DecodeError, EncodeError};
use crate::model::{LanguageMap, Property, Slot};
use crate::schema::PropertySchema;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the value under a property's key.
///
/// Collection properties accept a bare value (one slot) or an array (one slot
/// per element, each decoded independently). Functional properties take one
/// value; an array there is kept whole as one unknown slot.
pub fn decode_property(
    raw: &Value,
    schema: &PropertySchema,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<Slot>, DecodeError> {
    match raw {
        Value::Array(items) if !schema.is_functional() => items
            .iter()
            .map(|item| decode_slot(item, schema, ctx))
            .collect(),
        Value::Array(_) => {
            tracing::debug!(property = schema.name(), "array on functional property, keeping as unknown");
            Ok(vec![Slot::Unknown(raw.clone())])
        }
        _ => Ok(vec![decode_slot(raw, schema, ctx)?]),
    }
}

/// Decodes a `<name>Map` object, keeping only string entries.
pub fn decode_language_map(property: &str, raw: &Map<String, Value>) -> LanguageMap {
    let mut map = LanguageMap::new();
    for (tag, text) in raw {
        match text.as_str() {
            Some(text) => {
                map.insert(tag.as_str(), text);
            }
            None => {
                tracing::debug!(property, tag = tag.as_str(), "dropping non-string language map entry");
            }
        }
    }
    map
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes a property's key and, if configured, its `<name>Map` key into `out`.
///
/// Empty properties write nothing. A collection of one is written bare
/// unless the value is itself an array, which would read back as several.
pub fn encode_property(
    schema: &PropertySchema,
    property: &Property,
    out: &mut Map<String, Value>,
) -> Result<(), EncodeError> {
    let value = match property.slots() {
        [] => None,
        [slot] => {
            let value = encode_slot(slot)?;
            if !schema.is_functional() && value.is_array() {
                Some(Value::Array(vec![value]))
            } else {
                Some(value)
            }
        }
        slots if schema.is_functional() => {
            tracing::debug!(property = schema.name(), count = slots.len(), "functional property holds several values, writing the first");
            Some(encode_slot(&slots[0])?)
        }
        slots => Some(Value::Array(
            slots.iter().map(encode_slot).collect::<Result<_, _>>()?,
        )),
    };
    if let Some(value) = value {
        out.insert(schema.name().to_string(), value);
    }

    if let (Some(key), Some(map)) = (schema.map_key(), property.language_map()) {
        let entries = map
            .iter()
            .map(|(tag, text)| (tag.to_string(), Value::String(text.to_string())))
            .collect();
        out.insert(key, Value::Object(entries));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::context::DecodeOptions;
    use crate::model::Scalar;
    use crate::registry::TypeRegistry;
    use crate::schema::ScalarKind;
    use proptest::prelude::*;
    use serde_json::json;

    fn ctx() -> DecodeContext<'static> {
        DecodeContext::new(TypeRegistry::activity_streams(), DecodeOptions::new())
    }

    fn name_schema() -> PropertySchema {
        PropertySchema::collection("name").scalar(ScalarKind::String).language_map()
    }

    fn encode(schema: &PropertySchema, property: &Property) -> Map<String, Value> {
        let mut out = Map::new();
        encode_property(schema, property, &mut out).unwrap();
        out
    }

    fn strings(values: &[&str]) -> Property {
        Property {
            slots: values.iter().map(|v| Slot::Scalar(Scalar::from(*v))).collect(),
            language_map: None,
        }
    }

    #[test]
    fn test_singular_collapse() {
        let out = encode(&name_schema(), &strings(&["Fort Worth"]));
        assert_eq!(Value::Object(out), json!({"name": "Fort Worth"}));

        let slots = decode_property(&json!("Fort Worth"), &name_schema(), &ctx()).unwrap();
        assert_eq!(slots, vec![Slot::Scalar(Scalar::from("Fort Worth"))]);
    }

    #[test]
    fn test_multiple_values_keep_order() {
        let out = encode(&name_schema(), &strings(&["A", "B"]));
        assert_eq!(Value::Object(out), json!({"name": ["A", "B"]}));
    }

    #[test]
    fn test_empty_collection_is_omitted() {
        assert!(encode(&name_schema(), &Property::default()).is_empty());
    }

    #[test]
    fn test_mixed_array_decodes_element_wise() {
        let schema = PropertySchema::collection("tag").object_or_link();
        let slots = decode_property(
            &json!(["https://example.com/t", {"bad": 1}, {"type": "Mention", "href": "https://example.com/u"}]),
            &schema,
            &ctx(),
        )
        .unwrap();
        assert!(slots[0].as_reference().is_some());
        assert_eq!(slots[1], Slot::Unknown(json!({"bad": 1})));
        assert_eq!(slots[2].as_embedded().unwrap().entity().type_name(), "Mention");
    }

    #[test]
    fn test_functional_array_is_one_unknown() {
        let schema = PropertySchema::functional("href").iri();
        let raw = json!(["https://a.example", "https://b.example"]);
        let slots = decode_property(&raw, &schema, &ctx()).unwrap();
        assert_eq!(slots, vec![Slot::Unknown(raw.clone())]);

        let property = Property { slots, language_map: None };
        assert_eq!(encode(&schema, &property).get("href"), Some(&raw));
    }

    #[test]
    fn test_single_array_value_stays_wrapped() {
        let schema = name_schema();
        let property = Property {
            slots: vec![Slot::Unknown(json!([1, 2]))],
            language_map: None,
        };
        let out = encode(&schema, &property);
        assert_eq!(out.get("name"), Some(&json!([[1, 2]])));

        let slots = decode_property(&out["name"], &schema, &ctx()).unwrap();
        assert_eq!(slots, property.slots);
    }

    #[test]
    fn test_language_map_drops_non_strings() {
        let raw = json!({"en": "Hi", "fr": 3, "de": null, "es": "Hola"});
        let map = decode_language_map("content", raw.as_object().unwrap());
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("en", "Hi"), ("es", "Hola")]);
    }

    #[test]
    fn test_language_map_encoding() {
        let schema = name_schema();
        let mut property = Property::default();
        property.language_map = Some([("en", "Hi")].into_iter().collect());
        assert_eq!(Value::Object(encode(&schema, &property)), json!({"nameMap": {"en": "Hi"}}));

        // Configured but empty is still written
        property.language_map = Some(LanguageMap::new());
        assert_eq!(Value::Object(encode(&schema, &property)), json!({"nameMap": {}}));

        property.slots = vec![Slot::Scalar(Scalar::from("x"))];
        property.language_map = None;
        assert_eq!(Value::Object(encode(&schema, &property)), json!({"name": "x"}));
    }

    proptest! {
        #[test]
        fn test_collection_roundtrip(values in proptest::collection::vec("[a-zA-Z ]{0,12}", 0..5)) {
            let schema = name_schema();
            let refs: Vec<&str> = values.iter().map(String::as_str).collect();
            let property = strings(&refs);
            let out = encode(&schema, &property);

            match values.len() {
                0 => prop_assert!(out.get("name").is_none()),
                1 => prop_assert!(out["name"].is_string()),
                _ => prop_assert!(out["name"].is_array()),
            }
            if let Some(raw) = out.get("name") {
                prop_assert_eq!(decode_property(raw, &schema, &ctx()).unwrap(), property.slots);
            }
        }
    }
}
