//! Builder API for ergonomic entity construction.
//!
//! # Example
//!
//! ```rust
//! use astreams::TypeRegistry;
//!
//! let registry = TypeRegistry::activity_streams();
//! let create = registry
//!     .entity("Create")
//!     .unwrap()
//!     .id("https://example.com/activities/1".parse().unwrap())
//!     .reference("actor", "https://example.com/users/alice".parse().unwrap())
//!     .embed_new("object", "Note", |note| note
//!         .scalar("content", "Hello")
//!         .language("content", "fr", "Bonjour")
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(create.values("object").len(), 1);
//! ```

use serde_json::Value;

use crate::error::PropertyError;
use crate::model::{Embedded, Entity, Iri, Scalar, Slot};
use crate::registry::TypeRegistry;

/// Builder for one entity.
///
/// Errors are deferred: the first failing call is remembered, later calls are
/// ignored and [`build`](Self::build) returns the error.
#[derive(Debug, Clone)]
pub struct EntityBuilder<'r> {
    registry: &'r TypeRegistry,
    entity: Entity,
    error: Option<PropertyError>,
}

impl<'r> EntityBuilder<'r> {
    /// Creates a builder around an empty entity.
    pub fn new(registry: &'r TypeRegistry, entity: Entity) -> Self {
        Self { registry, entity, error: None }
    }

    /// Sets the entity's IRI.
    pub fn id(mut self, id: Iri) -> Self {
        self.entity.set_id(Some(id));
        self
    }

    /// Adds a name to the `type` list.
    pub fn add_type(mut self, name: impl Into<String>) -> Self {
        self.entity.add_type(name);
        self
    }

    /// Adds a value: appended for collection properties, replacing for
    /// functional ones.
    pub fn value(mut self, property: &str, value: impl Into<Slot>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let functional = self
            .entity
            .term()
            .property(property)
            .is_some_and(|p| p.is_functional());
        let result = if functional {
            self.entity.set(property, value)
        } else {
            self.entity.append(property, value)
        };
        self.record(result)
    }

    /// Adds a scalar value.
    pub fn scalar(self, property: &str, value: impl Into<Scalar>) -> Self {
        self.value(property, value.into())
    }

    /// Adds an IRI reference.
    pub fn reference(self, property: &str, iri: Iri) -> Self {
        self.value(property, iri)
    }

    /// Embeds an entity as the first capability the property accepts that
    /// the entity's type implements.
    pub fn embed(self, property: &str, entity: Entity) -> Self {
        if self.error.is_some() {
            return self;
        }
        let Some(schema) = self.entity.term().property(property) else {
            let err = PropertyError::UnknownProperty {
                term: self.entity.type_name().to_string(),
                property: property.to_string(),
            };
            return self.record(Err(err));
        };
        let embedded = schema
            .capability_for(entity.term())
            .and_then(|capability| Embedded::new(capability, entity));
        match embedded {
            Some(embedded) => self.value(property, embedded),
            None => {
                let err = PropertyError::RepresentationNotAccepted {
                    term: self.entity.type_name().to_string(),
                    property: property.to_string(),
                };
                self.record(Err(err))
            }
        }
    }

    /// Builds a new entity of type `type_name` with `f` and embeds it.
    pub fn embed_new<F>(self, property: &str, type_name: &str, f: F) -> Self
    where
        F: FnOnce(EntityBuilder<'r>) -> EntityBuilder<'r>,
    {
        if self.error.is_some() {
            return self;
        }
        let Some(builder) = self.registry.entity(type_name) else {
            let err = PropertyError::UnknownType { name: type_name.to_string() };
            return self.record(Err(err));
        };
        match f(builder).build() {
            Ok(entity) => self.embed(property, entity),
            Err(err) => self.record(Err(err)),
        }
    }

    /// Sets one entry of a property's natural-language map.
    pub fn language(mut self, property: &str, tag: &str, text: impl Into<String>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let result = self.entity.set_language(property, tag, text);
        self.record(result)
    }

    /// Sets a key the term does not declare.
    pub fn extension(mut self, key: impl Into<String>, value: Value) -> Self {
        if self.error.is_some() {
            return self;
        }
        let result = self.entity.set_extension(key, value).map(|_| ());
        self.record(result)
    }

    /// Finishes the entity, or returns the first error encountered.
    pub fn build(self) -> Result<Entity, PropertyError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.entity),
        }
    }

    fn record(mut self, result: Result<(), PropertyError>) -> Self {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Capability;
    use serde_json::json;

    #[test]
    fn test_builder_collects_values() {
        let registry = TypeRegistry::activity_streams();
        let note = registry
            .entity("Note")
            .unwrap()
            .id(Iri::parse("https://example.com/notes/1").unwrap())
            .scalar("name", "A")
            .scalar("name", "B")
            .scalar("summary", "short")
            .extension("sensitive", json!(false))
            .build()
            .unwrap();

        assert_eq!(note.values("name").len(), 2);
        assert_eq!(note.id().unwrap().as_str(), "https://example.com/notes/1");
        assert_eq!(note.extensions().get("sensitive"), Some(&json!(false)));
    }

    #[test]
    fn test_builder_functional_value_replaces() {
        let registry = TypeRegistry::activity_streams();
        let link = registry
            .entity("Link")
            .unwrap()
            .reference("href", Iri::parse("https://a.example").unwrap())
            .reference("href", Iri::parse("https://b.example").unwrap())
            .build()
            .unwrap();
        assert_eq!(link.values("href").len(), 1);
        assert_eq!(link.first("href").unwrap().as_reference().unwrap().as_str(), "https://b.example");
    }

    #[test]
    fn test_builder_embed_picks_declared_capability() {
        let registry = TypeRegistry::activity_streams();
        let mention = registry.construct("Mention", Capability::Link).unwrap();
        let note = registry.entity("Note").unwrap().embed("tag", mention).build().unwrap();

        let embedded = note.first("tag").unwrap().as_embedded().unwrap();
        assert_eq!(embedded.capability(), Capability::Link);
    }

    #[test]
    fn test_builder_reports_first_error() {
        let registry = TypeRegistry::activity_streams();
        let err = registry
            .entity("Note")
            .unwrap()
            .scalar("nonsense", 1.0)
            .language("url", "en", "x")
            .build()
            .unwrap_err();
        assert!(matches!(err, PropertyError::UnknownProperty { ref property, .. } if property == "nonsense"));

        let err = registry
            .entity("Create")
            .unwrap()
            .embed_new("object", "NoSuchType", |e| e)
            .build()
            .unwrap_err();
        assert_eq!(err, PropertyError::UnknownType { name: "NoSuchType".to_string() });
    }

    #[test]
    fn test_builder_embed_rejects_wrong_capability() {
        let registry = TypeRegistry::activity_streams();
        // `inbox` accepts only ordered collections
        let err = registry
            .entity("Person")
            .unwrap()
            .embed_new("inbox", "Note", |e| e)
            .build()
            .unwrap_err();
        assert!(matches!(err, PropertyError::RepresentationNotAccepted { .. }));
    }
}
