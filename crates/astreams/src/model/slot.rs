//! Value slots: the decoded state of one occurrence of a property value.

use serde_json::Value;

use crate::model::{Entity, Iri, Scalar};
use crate::schema::Capability;

/// A sub-document decoded as one of the capabilities its property accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    capability: Capability,
    entity: Box<Entity>,
}

impl Embedded {
    /// Wraps `entity` as `capability`. Returns None if the entity's type
    /// does not implement that capability.
    pub fn new(capability: Capability, entity: Entity) -> Option<Self> {
        entity
            .term()
            .capabilities()
            .contains(capability)
            .then(|| Self { capability, entity: Box::new(entity) })
    }

    /// For entities the registry already resolved as `capability`.
    pub(crate) fn resolved(capability: Capability, entity: Entity) -> Self {
        Self { capability, entity: Box::new(entity) }
    }

    /// The capability this value was resolved as.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Views the entity as `capability`, if its type implements it.
    ///
    /// A value resolved as an Object may still be viewed as an Activity
    /// when its type is one.
    pub fn as_capable(&self, capability: Capability) -> Option<&Entity> {
        self.entity
            .term()
            .capabilities()
            .contains(capability)
            .then_some(&*self.entity)
    }

    pub fn into_entity(self) -> Entity {
        *self.entity
    }
}

/// One property value. Exactly one representation is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Scalar(Scalar),
    Reference(Iri),
    Embedded(Embedded),
    /// Data that matched no accepted representation, kept as received.
    Unknown(Value),
}

impl Slot {
    /// Embeds `entity` as `capability`. Returns None if the entity's type
    /// does not implement that capability.
    pub fn embed(capability: Capability, entity: Entity) -> Option<Slot> {
        Embedded::new(capability, entity).map(Slot::Embedded)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Slot::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Iri> {
        match self {
            Slot::Reference(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&Embedded> {
        match self {
            Slot::Embedded(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_unknown(&self) -> Option<&Value> {
        match self {
            Slot::Unknown(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Slot::Unknown(_))
    }

    /// The IRI this value points at: the reference itself, or the `id` of an
    /// embedded entity.
    pub fn target_iri(&self) -> Option<&Iri> {
        match self {
            Slot::Reference(iri) => Some(iri),
            Slot::Embedded(e) => e.entity().id(),
            _ => None,
        }
    }
}

impl From<Scalar> for Slot {
    fn from(v: Scalar) -> Self {
        Slot::Scalar(v)
    }
}

impl From<Iri> for Slot {
    fn from(v: Iri) -> Self {
        Slot::Reference(v)
    }
}

impl From<Embedded> for Slot {
    fn from(v: Embedded) -> Self {
        Slot::Embedded(v)
    }
}
