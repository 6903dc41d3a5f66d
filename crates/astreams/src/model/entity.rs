//! Entities: one decoded or constructed vocabulary document.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::PropertyError;
use crate::model::{Iri, LanguageMap, Property, Slot};
use crate::registry::Term;
use crate::schema::PropertySchema;

/// Keys that never become extensions.
const RESERVED_KEYS: [&str; 3] = ["id", "type", "@context"];

/// An instance of a registered term.
///
/// Holds one [`Property`] per property the term declares, in schema order,
/// plus every top-level key the term does not declare.
#[derive(Debug, Clone)]
pub struct Entity {
    term: Arc<Term>,
    id: Option<Iri>,
    types: Vec<Value>,
    properties: Vec<Property>,
    extensions: Map<String, Value>,
}

impl Entity {
    /// Creates an empty instance of `term`, typed with the term's name.
    pub fn new(term: Arc<Term>) -> Self {
        let properties = vec![Property::default(); term.properties().len()];
        let types = vec![Value::String(term.name().to_string())];
        Self {
            term,
            id: None,
            types,
            properties,
            extensions: Map::new(),
        }
    }

    pub fn term(&self) -> &Arc<Term> {
        &self.term
    }

    /// The canonical name of this entity's term.
    pub fn type_name(&self) -> &str {
        self.term.name()
    }

    pub fn id(&self) -> Option<&Iri> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: Option<Iri>) {
        self.id = id;
    }

    /// The `type` list, including names the registry does not know.
    ///
    /// Decoding replaces it with the document's list; the term's canonical
    /// name is added on encode if it is missing.
    pub fn types(&self) -> &[Value] {
        &self.types
    }

    /// The string entries of the `type` list.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.iter().filter_map(Value::as_str)
    }

    /// Appends a type name unless already present.
    pub fn add_type(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.type_names().any(|t| t == name) {
            self.types.push(Value::String(name));
        }
    }

    /// The values of a declared property; empty if the term lacks it.
    pub fn values(&self, property: &str) -> &[Slot] {
        self.property(property).map(Property::slots).unwrap_or(&[])
    }

    /// The first value of a declared property.
    pub fn first(&self, property: &str) -> Option<&Slot> {
        self.values(property).first()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.term.index_of(name).map(|i| &self.properties[i])
    }

    /// Iterates declared properties with their schemas, in schema order.
    pub fn properties(&self) -> impl Iterator<Item = (&PropertySchema, &Property)> {
        self.term.properties().iter().zip(self.properties.iter())
    }

    /// Replaces every value of `property` with `value`.
    pub fn set(&mut self, property: &str, value: impl Into<Slot>) -> Result<(), PropertyError> {
        let value = value.into();
        let index = self.checked_index(property, &value)?;
        self.properties[index].slots = vec![value];
        Ok(())
    }

    /// Appends a value to a collection property.
    pub fn append(&mut self, property: &str, value: impl Into<Slot>) -> Result<(), PropertyError> {
        let value = value.into();
        let index = self.checked_index(property, &value)?;
        if self.term.properties()[index].is_functional() {
            return Err(PropertyError::NotCollection {
                term: self.term.name().to_string(),
                property: property.to_string(),
            });
        }
        self.properties[index].slots.push(value);
        Ok(())
    }

    /// Removes every value of `property`. The language map is left alone.
    pub fn clear(&mut self, property: &str) -> Result<(), PropertyError> {
        let index = self.index(property)?;
        self.properties[index].slots.clear();
        Ok(())
    }

    pub fn language_map(&self, property: &str) -> Option<&LanguageMap> {
        self.property(property).and_then(Property::language_map)
    }

    /// Sets one entry of `property`'s language map, creating the map if needed.
    pub fn set_language(
        &mut self,
        property: &str,
        tag: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), PropertyError> {
        let index = self.mappable_index(property)?;
        self.properties[index]
            .language_map
            .get_or_insert_with(LanguageMap::new)
            .insert(tag, text);
        Ok(())
    }

    /// Replaces `property`'s language map. `Some(empty)` is still encoded.
    pub fn set_language_map(
        &mut self,
        property: &str,
        map: Option<LanguageMap>,
    ) -> Result<(), PropertyError> {
        let index = self.mappable_index(property)?;
        self.properties[index].language_map = map;
        Ok(())
    }

    /// Top-level keys the term does not declare, as received.
    pub fn extensions(&self) -> &Map<String, Value> {
        &self.extensions
    }

    /// Sets an extension key, returning the previous value.
    ///
    /// Keys the term declares (including `<name>Map` keys), `id`, `type` and
    /// `@context` are rejected.
    pub fn set_extension(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, PropertyError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) || self.term.lookup_key(&key).is_some() {
            return Err(PropertyError::ReservedKey {
                term: self.term.name().to_string(),
                key,
            });
        }
        Ok(self.extensions.insert(key, value))
    }

    pub fn remove_extension(&mut self, key: &str) -> Option<Value> {
        self.extensions.shift_remove(key)
    }

    // Codec access: bypasses representation checks, the decoder produces
    // only accepted representations or unknown values.

    pub(crate) fn property_at(&self, index: usize) -> &Property {
        &self.properties[index]
    }

    pub(crate) fn property_at_mut(&mut self, index: usize) -> &mut Property {
        &mut self.properties[index]
    }

    pub(crate) fn types_mut(&mut self) -> &mut Vec<Value> {
        &mut self.types
    }

    pub(crate) fn extensions_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.extensions
    }

    fn index(&self, property: &str) -> Result<usize, PropertyError> {
        self.term
            .index_of(property)
            .ok_or_else(|| PropertyError::UnknownProperty {
                term: self.term.name().to_string(),
                property: property.to_string(),
            })
    }

    fn checked_index(&self, property: &str, value: &Slot) -> Result<usize, PropertyError> {
        let index = self.index(property)?;
        if !self.term.properties()[index].accepts(value) {
            return Err(PropertyError::RepresentationNotAccepted {
                term: self.term.name().to_string(),
                property: property.to_string(),
            });
        }
        Ok(index)
    }

    fn mappable_index(&self, property: &str) -> Result<usize, PropertyError> {
        let index = self.index(property)?;
        if !self.term.properties()[index].is_language_mappable() {
            return Err(PropertyError::NotLanguageMappable {
                term: self.term.name().to_string(),
                property: property.to_string(),
            });
        }
        Ok(index)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.term.name() == other.term.name()
            && self.id == other.id
            && self.types == other.types
            && self.properties == other.properties
            && self.extensions == other.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;
    use crate::registry::TypeRegistry;
    use crate::schema::Capability;
    use serde_json::json;

    fn note() -> Entity {
        TypeRegistry::activity_streams()
            .construct("Note", Capability::Object)
            .unwrap()
    }

    #[test]
    fn test_new_entity_is_empty() {
        let note = note();
        assert_eq!(note.type_name(), "Note");
        assert!(note.id().is_none());
        assert_eq!(note.types(), &[json!("Note")]);
        assert!(note.values("name").is_empty());
        assert!(note.properties().all(|(_, p)| p.is_empty()));
    }

    #[test]
    fn test_set_replaces_and_append_accumulates() {
        let mut note = note();
        note.append("name", Scalar::from("A")).unwrap();
        note.append("name", Scalar::from("B")).unwrap();
        assert_eq!(note.values("name").len(), 2);

        note.set("name", Scalar::from("C")).unwrap();
        assert_eq!(note.values("name"), &[Slot::Scalar(Scalar::from("C"))]);

        note.clear("name").unwrap();
        assert!(note.values("name").is_empty());
    }

    #[test]
    fn test_functional_rejects_append() {
        let mut note = note();
        let url = Iri::parse("https://example.com/replies").unwrap();
        assert!(matches!(
            note.append("replies", url),
            Err(PropertyError::NotCollection { .. })
        ));
    }

    #[test]
    fn test_set_rejects_unaccepted_representation() {
        let mut note = note();
        // `published` takes a date-time only
        assert!(matches!(
            note.set("published", Scalar::from("yesterday")),
            Err(PropertyError::RepresentationNotAccepted { .. })
        ));
        assert!(matches!(
            note.set("nonsense", Scalar::from(1.0)),
            Err(PropertyError::UnknownProperty { .. })
        ));
        // Unknown values are always accepted
        note.set("published", Slot::Unknown(json!({"custom": true}))).unwrap();
    }

    #[test]
    fn test_set_rejects_reference_shadowed_by_token() {
        let mut place = TypeRegistry::activity_streams()
            .construct("Place", Capability::Object)
            .unwrap();
        assert!(matches!(
            place.set("units", Iri::parse("cm").unwrap()),
            Err(PropertyError::RepresentationNotAccepted { .. })
        ));
        place.set("units", Scalar::Enumerated("cm".to_string())).unwrap();
        place.set("units", Iri::parse("https://example.com/units/furlong").unwrap()).unwrap();
    }

    #[test]
    fn test_language_map_is_independent_of_values() {
        let mut note = note();
        note.set_language("content", "en", "Hi").unwrap();
        assert!(note.values("content").is_empty());
        assert_eq!(note.language_map("content").unwrap().get("en"), Some("Hi"));

        assert!(matches!(
            note.set_language("url", "en", "x"),
            Err(PropertyError::NotLanguageMappable { .. })
        ));

        note.set_language_map("content", Some(LanguageMap::new())).unwrap();
        assert!(note.language_map("content").unwrap().is_empty());
        note.set_language_map("content", None).unwrap();
        assert!(note.language_map("content").is_none());
    }

    #[test]
    fn test_extensions_reject_declared_keys() {
        let mut note = note();
        assert_eq!(note.set_extension("sensitive", json!(true)).unwrap(), None);
        for key in ["id", "type", "@context", "name", "nameMap"] {
            assert!(
                matches!(note.set_extension(key, json!(1)), Err(PropertyError::ReservedKey { .. })),
                "{key} should be reserved"
            );
        }
        assert_eq!(note.remove_extension("sensitive"), Some(json!(true)));
    }

    #[test]
    fn test_add_type_deduplicates() {
        let mut note = note();
        note.add_type("Note");
        note.add_type("Note");
        note.add_type("schema:Article");
        assert_eq!(note.type_names().collect::<Vec<_>>(), vec!["Note", "schema:Article"]);
    }
}
