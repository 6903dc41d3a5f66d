//! The type registry: wire type names to capability-tagged terms.
//!
//! A registry is assembled once with [`RegistryBuilder`] and read-only
//! afterwards, so shared references can be used from any number of threads.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::RegistryError;
use crate::model::{Entity, EntityBuilder};
use crate::schema::{Capability, CapabilitySet, PropertySchema, TermSchema};

/// Which part of a property a top-level key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyRole {
    /// `name`
    Value,
    /// `nameMap`
    LanguageMap,
}

/// A registered term with its inheritance resolved.
#[derive(Debug)]
pub struct Term {
    name: String,
    capabilities: CapabilitySet,
    ancestors: Vec<String>,
    properties: Vec<PropertySchema>,
    keys: FxHashMap<String, (usize, KeyRole)>,
}

impl Term {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own capabilities plus those of every ancestor.
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Every ancestor, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// Declared properties, inherited ones first.
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.index_of(name).map(|i| &self.properties[i])
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        match self.keys.get(name) {
            Some((index, KeyRole::Value)) => Some(*index),
            _ => None,
        }
    }

    /// Returns true if this term is `name` or inherits from it.
    pub fn is_or_extends(&self, name: &str) -> bool {
        self.name == name || self.ancestors.iter().any(|a| a == name)
    }

    pub(crate) fn lookup_key(&self, key: &str) -> Option<(usize, KeyRole)> {
        self.keys.get(key).copied()
    }
}

/// Read-only table of registered terms.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    terms: Vec<Arc<Term>>,
    by_name: FxHashMap<String, usize>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Term>> {
        self.by_name.get(name).map(|i| &self.terms[*i])
    }

    /// Looks up `name` as a term implementing `capability`.
    ///
    /// None means the name is unknown or does not implement the capability;
    /// callers try the next candidate.
    pub fn resolve(&self, name: &str, capability: Capability) -> Option<&Arc<Term>> {
        self.get(name)
            .filter(|term| term.capabilities().contains(capability))
    }

    pub fn resolve_object(&self, name: &str) -> Option<&Arc<Term>> {
        self.resolve(name, Capability::Object)
    }

    pub fn resolve_link(&self, name: &str) -> Option<&Arc<Term>> {
        self.resolve(name, Capability::Link)
    }

    pub fn resolve_collection(&self, name: &str) -> Option<&Arc<Term>> {
        self.resolve(name, Capability::Collection)
    }

    pub fn resolve_image(&self, name: &str) -> Option<&Arc<Term>> {
        self.resolve(name, Capability::Image)
    }

    /// Creates an empty entity of `name`, if it implements `capability`.
    pub fn construct(&self, name: &str, capability: Capability) -> Option<Entity> {
        self.resolve(name, capability)
            .map(|term| Entity::new(Arc::clone(term)))
    }

    /// Starts building an entity of `name`.
    pub fn entity(&self, name: &str) -> Option<EntityBuilder<'_>> {
        self.get(name)
            .map(|term| EntityBuilder::new(self, Entity::new(Arc::clone(term))))
    }

    /// Returns true if `name` is registered and is or extends `ancestor`.
    pub fn is_or_extends(&self, name: &str, ancestor: &str) -> bool {
        self.get(name).is_some_and(|term| term.is_or_extends(ancestor))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates terms in registration order.
    pub fn terms(&self) -> impl Iterator<Item = &Arc<Term>> {
        self.terms.iter()
    }
}

/// Builder for a [`TypeRegistry`].
///
/// Parents must be registered before their children.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    registry: TypeRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from every term of an existing registry, to extend it.
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        Self { registry: registry.clone() }
    }

    /// Registers a term, resolving its properties and capabilities against
    /// its already-registered parents.
    pub fn register(mut self, schema: TermSchema) -> Result<Self, RegistryError> {
        let name = schema.name().to_string();
        if self.registry.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateType { name });
        }

        let mut own = FxHashSet::default();
        for property in schema.own_properties() {
            if !own.insert(property.name()) {
                return Err(RegistryError::DuplicateProperty {
                    name,
                    property: property.name().to_string(),
                });
            }
        }

        let mut parents = Vec::new();
        for parent in schema.parents() {
            let term = self.registry.get(parent).ok_or_else(|| RegistryError::UnknownParent {
                name: name.clone(),
                parent: parent.to_string(),
            })?;
            parents.push(Arc::clone(term));
        }

        let mut capabilities: CapabilitySet = schema.own_capabilities().iter().copied().collect();
        let mut ancestors: Vec<String> = Vec::new();
        let mut properties: Vec<PropertySchema> = Vec::new();
        for parent in &parents {
            capabilities = capabilities.union(parent.capabilities());
            for ancestor in std::iter::once(&parent.name).chain(parent.ancestors.iter()) {
                if !ancestors.contains(ancestor) {
                    ancestors.push(ancestor.clone());
                }
            }
            for property in parent.properties() {
                if !properties.iter().any(|p| p.name() == property.name()) {
                    properties.push(property.clone());
                }
            }
        }

        // Own declarations refine inherited ones in place
        for property in schema.own_properties() {
            match properties.iter_mut().find(|p| p.name() == property.name()) {
                Some(slot) => *slot = property.clone(),
                None => properties.push(property.clone()),
            }
        }
        let removed: Vec<&str> = schema.removed_properties().collect();
        properties.retain(|p| !removed.contains(&p.name()));

        let mut keys = FxHashMap::default();
        for (index, property) in properties.iter().enumerate() {
            keys.insert(property.name().to_string(), (index, KeyRole::Value));
        }
        for (index, property) in properties.iter().enumerate() {
            if let Some(map_key) = property.map_key() {
                keys.entry(map_key).or_insert((index, KeyRole::LanguageMap));
            }
        }

        let term = Term {
            name: name.clone(),
            capabilities,
            ancestors,
            properties,
            keys,
        };
        self.registry.by_name.insert(name, self.registry.terms.len());
        self.registry.terms.push(Arc::new(term));
        Ok(self)
    }

    /// Registers several terms in order.
    pub fn register_all(
        self,
        schemas: impl IntoIterator<Item = TermSchema>,
    ) -> Result<Self, RegistryError> {
        schemas.into_iter().try_fold(self, RegistryBuilder::register)
    }

    pub fn build(self) -> TypeRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ScalarKind;

    fn small_registry() -> TypeRegistry {
        TypeRegistry::builder()
            .register(
                TermSchema::new("Base")
                    .capability(Capability::Object)
                    .property(PropertySchema::collection("name").scalar(ScalarKind::String).language_map())
                    .property(PropertySchema::functional("size").scalar(ScalarKind::Float)),
            )
            .unwrap()
            .register(
                TermSchema::new("Child")
                    .extends("Base")
                    .capability(Capability::Link)
                    .property(PropertySchema::functional("href").iri())
                    .without("size"),
            )
            .unwrap()
            .build()
    }

    #[test]
    fn test_inheritance_flattens_properties() {
        let registry = small_registry();
        let child = registry.get("Child").unwrap();
        let names: Vec<_> = child.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["name", "href"]);
        assert_eq!(child.ancestors(), &["Base".to_string()]);
        assert!(child.capabilities().contains(Capability::Object));
        assert!(child.capabilities().contains(Capability::Link));
        assert_eq!(child.lookup_key("nameMap"), Some((0, KeyRole::LanguageMap)));
        assert_eq!(child.index_of("nameMap"), None);
        assert_eq!(child.index_of("size"), None);
    }

    #[test]
    fn test_resolve_requires_capability() {
        let registry = small_registry();
        assert!(registry.resolve_object("Base").is_some());
        assert!(registry.resolve_link("Base").is_none());
        assert!(registry.resolve_link("Child").is_some());
        assert!(registry.resolve_object("Missing").is_none());
        assert!(registry.construct("Base", Capability::Collection).is_none());
        assert!(registry.is_or_extends("Child", "Base"));
        assert!(!registry.is_or_extends("Base", "Child"));
    }

    #[test]
    fn test_register_errors() {
        let err = TypeRegistry::builder()
            .register(TermSchema::new("Orphan").extends("Nowhere"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownParent { name: "Orphan".into(), parent: "Nowhere".into() }
        );

        let err = TypeRegistry::builder()
            .register(TermSchema::new("A"))
            .and_then(|b| b.register(TermSchema::new("A")))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateType { name: "A".into() });

        let err = TypeRegistry::builder()
            .register(
                TermSchema::new("B")
                    .property(PropertySchema::functional("x"))
                    .property(PropertySchema::collection("x")),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateProperty { .. }));
    }

    #[test]
    fn test_own_property_refines_inherited() {
        let registry = RegistryBuilder::from_registry(&small_registry())
            .register(
                TermSchema::new("Sized")
                    .extends("Base")
                    .property(PropertySchema::functional("size").scalar(ScalarKind::NonNegativeInteger)),
            )
            .unwrap()
            .build();
        let sized = registry.get("Sized").unwrap();
        assert_eq!(sized.properties().len(), 2);
        assert_eq!(sized.property("size").unwrap().scalars(), &[ScalarKind::NonNegativeInteger]);
        // The source registry is unchanged
        assert!(small_registry().get("Sized").is_none());
    }
}
