//! Declarative schema types.
//!
//! A vocabulary term is described by data, not code: its name, its parents,
//! the capabilities it implements and the shape of each property it declares.
//! The codec consumes these descriptions; it never hard-codes a property.

pub mod vocab;

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::codec::scalar::{decode_scalar, encode_scalar};
use crate::model::{Scalar, Slot};
use crate::registry::Term;

/// Abstract roles a concrete term can implement (Object-like, Link-like, ...).
///
/// Properties name the capabilities they accept, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Capability {
    Object = 0,
    Link = 1,
    Activity = 2,
    IntransitiveActivity = 3,
    Collection = 4,
    OrderedCollection = 5,
    CollectionPage = 6,
    OrderedCollectionPage = 7,
    Image = 8,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Capability; 9] = [
        Capability::Object,
        Capability::Link,
        Capability::Activity,
        Capability::IntransitiveActivity,
        Capability::Collection,
        Capability::OrderedCollection,
        Capability::CollectionPage,
        Capability::OrderedCollectionPage,
        Capability::Image,
    ];

    /// Human-readable name, matching the vocabulary's root term for the role.
    pub fn name(self) -> &'static str {
        match self {
            Capability::Object => "Object",
            Capability::Link => "Link",
            Capability::Activity => "Activity",
            Capability::IntransitiveActivity => "IntransitiveActivity",
            Capability::Collection => "Collection",
            Capability::OrderedCollection => "OrderedCollection",
            Capability::CollectionPage => "CollectionPage",
            Capability::OrderedCollectionPage => "OrderedCollectionPage",
            Capability::Image => "Image",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of capabilities, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CapabilitySet(u16);

impl CapabilitySet {
    /// The empty set.
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, capability: Capability) {
        self.0 |= capability.bit();
    }

    pub fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }

    pub fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Capability> {
        Capability::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = CapabilitySet::new();
        for capability in iter {
            set.insert(capability);
        }
        set
    }
}

/// The primitive and semantic scalar types a property may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// `xsd:float`, a JSON number.
    Float,
    /// `xsd:string`.
    String,
    /// `rdf:langString`, a plain string in the property's default language.
    LangString,
    /// `xsd:dateTime`, RFC 3339.
    DateTime,
    /// `xsd:duration`, ISO 8601.
    Duration,
    /// RFC 2045 media type, `type/subtype`.
    MimeType,
    /// BCP 47 language tag.
    LanguageTag,
    /// `xsd:nonNegativeInteger`.
    NonNegativeInteger,
    /// `xsd:boolean`.
    Boolean,
    /// A string restricted to a fixed domain of tokens.
    Enumerated(&'static [&'static str]),
}

impl ScalarKind {
    /// The vocabulary name of this kind, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Float => "xsd:float",
            ScalarKind::String => "xsd:string",
            ScalarKind::LangString => "rdf:langString",
            ScalarKind::DateTime => "xsd:dateTime",
            ScalarKind::Duration => "xsd:duration",
            ScalarKind::MimeType => "rfc2045",
            ScalarKind::LanguageTag => "bcp47",
            ScalarKind::NonNegativeInteger => "xsd:nonNegativeInteger",
            ScalarKind::Boolean => "xsd:boolean",
            ScalarKind::Enumerated(_) => "enumerated",
        }
    }

    /// Returns true if `scalar` is a value of this kind.
    pub fn admits(&self, scalar: &Scalar) -> bool {
        match (self, scalar) {
            (ScalarKind::Float, Scalar::Float(_))
            | (ScalarKind::String, Scalar::String(_))
            | (ScalarKind::LangString, Scalar::LangString(_))
            | (ScalarKind::DateTime, Scalar::DateTime(_))
            | (ScalarKind::Duration, Scalar::Duration(_))
            | (ScalarKind::MimeType, Scalar::MimeType(_))
            | (ScalarKind::LanguageTag, Scalar::LanguageTag(_))
            | (ScalarKind::NonNegativeInteger, Scalar::NonNegativeInteger(_))
            | (ScalarKind::Boolean, Scalar::Boolean(_)) => true,
            (ScalarKind::Enumerated(domain), Scalar::Enumerated(token)) => {
                domain.contains(&token.as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The declared shape of one property: cardinality, accepted representations
/// and whether a `<name>Map` natural-language side table exists.
///
/// Representations are always tried scalars first (in the order added), then
/// IRI, then capabilities (in the order added), whatever order the builder
/// methods were called in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySchema {
    name: Cow<'static, str>,
    functional: bool,
    scalars: Vec<ScalarKind>,
    iri: bool,
    capabilities: Vec<Capability>,
    language_map: bool,
}

impl PropertySchema {
    fn new(name: impl Into<Cow<'static, str>>, functional: bool) -> Self {
        Self {
            name: name.into(),
            functional,
            scalars: Vec::new(),
            iri: false,
            capabilities: Vec::new(),
            language_map: false,
        }
    }

    /// A property holding at most one value.
    pub fn functional(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, true)
    }

    /// A property holding an ordered sequence of values.
    pub fn collection(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, false)
    }

    /// Accepts a scalar kind, after any scalar kinds already accepted.
    pub fn scalar(mut self, kind: ScalarKind) -> Self {
        if !self.scalars.contains(&kind) {
            self.scalars.push(kind);
        }
        self
    }

    /// Accepts bare IRI references.
    pub fn iri(mut self) -> Self {
        self.iri = true;
        self
    }

    /// Accepts embedded objects implementing `capability`, after any
    /// capabilities already accepted.
    pub fn capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// The common range of relationship properties: an IRI, an Object or a Link.
    pub fn object_or_link(self) -> Self {
        self.iri()
            .capability(Capability::Object)
            .capability(Capability::Link)
    }

    /// Declares the `<name>Map` natural-language side table.
    pub fn language_map(mut self) -> Self {
        self.language_map = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_functional(&self) -> bool {
        self.functional
    }

    pub fn scalars(&self) -> &[ScalarKind] {
        &self.scalars
    }

    pub fn accepts_iri(&self) -> bool {
        self.iri
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn is_language_mappable(&self) -> bool {
        self.language_map
    }

    /// The wire key of the natural-language map, if the property has one.
    pub fn map_key(&self) -> Option<String> {
        self.language_map.then(|| format!("{}Map", self.name))
    }

    /// Returns true if `slot` is a representation this property accepts.
    ///
    /// A value is only accepted if it decodes back as the same slot, so a
    /// representation shadowed by an earlier-declared one is rejected (an
    /// IRI such as `cm` on a property that first accepts a `cm` token).
    /// Unknown values are always accepted: they are the forward-compatibility path.
    pub fn accepts(&self, slot: &Slot) -> bool {
        match slot {
            Slot::Scalar(scalar) => {
                if !self.scalars.iter().any(|kind| kind.admits(scalar)) {
                    return false;
                }
                // Non-finite floats fail later, on encode
                match encode_scalar(scalar) {
                    Ok(raw) => self.claim_scalar(&raw).as_ref() == Some(scalar),
                    Err(_) => true,
                }
            }
            Slot::Reference(iri) => {
                self.iri && self.claim_scalar(&Value::String(iri.as_str().to_string())).is_none()
            }
            Slot::Embedded(embedded) => {
                self.capabilities
                    .iter()
                    .find(|capability| embedded.entity().term().capabilities().contains(**capability))
                    == Some(&embedded.capability())
            }
            Slot::Unknown(_) => true,
        }
    }

    /// The scalar the first matching kind decodes `raw` as.
    fn claim_scalar(&self, raw: &Value) -> Option<Scalar> {
        self.scalars
            .iter()
            .find_map(|kind| decode_scalar(raw, *kind).ok().flatten())
    }

    /// The first accepted capability `term` implements, in declared order.
    pub fn capability_for(&self, term: &Term) -> Option<Capability> {
        self.capabilities
            .iter()
            .copied()
            .find(|capability| term.capabilities().contains(*capability))
    }
}

/// The declaration of one vocabulary term.
///
/// Parents listed in `extends` contribute their properties (minus `without`)
/// and capabilities when the term is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermSchema {
    name: Cow<'static, str>,
    extends: Vec<Cow<'static, str>>,
    capabilities: Vec<Capability>,
    properties: Vec<PropertySchema>,
    without: Vec<Cow<'static, str>>,
}

impl TermSchema {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            extends: Vec::new(),
            capabilities: Vec::new(),
            properties: Vec::new(),
            without: Vec::new(),
        }
    }

    /// Adds a parent term.
    pub fn extends(mut self, parent: impl Into<Cow<'static, str>>) -> Self {
        self.extends.push(parent.into());
        self
    }

    /// Declares a capability this term implements itself.
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Declares a property.
    pub fn property(mut self, property: PropertySchema) -> Self {
        self.properties.push(property);
        self
    }

    /// Declares several properties, in order.
    pub fn properties(mut self, properties: impl IntoIterator<Item = PropertySchema>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Drops an inherited property.
    pub fn without(mut self, property: impl Into<Cow<'static, str>>) -> Self {
        self.without.push(property.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> impl Iterator<Item = &str> {
        self.extends.iter().map(|p| p.as_ref())
    }

    pub fn own_capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn own_properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn removed_properties(&self) -> impl Iterator<Item = &str> {
        self.without.iter().map(|p| p.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateTime, Iri};

    #[test]
    fn test_capability_set_membership() {
        let set: CapabilitySet = [Capability::Link, Capability::Object].into_iter().collect();
        assert!(set.contains(Capability::Object));
        assert!(set.contains(Capability::Link));
        assert!(!set.contains(Capability::Collection));
        // Iteration follows declaration order, not insertion order
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Capability::Object, Capability::Link]);
        assert!(CapabilitySet::EMPTY.is_empty());
    }

    #[test]
    fn test_representation_order_is_structural() {
        let schema = PropertySchema::collection("closed")
            .capability(Capability::Object)
            .iri()
            .scalar(ScalarKind::DateTime)
            .scalar(ScalarKind::Boolean);

        assert_eq!(schema.scalars(), &[ScalarKind::DateTime, ScalarKind::Boolean]);
        assert!(schema.accepts_iri());
        assert_eq!(schema.capabilities(), &[Capability::Object]);
    }

    #[test]
    fn test_map_key() {
        assert_eq!(
            PropertySchema::collection("name").language_map().map_key().as_deref(),
            Some("nameMap")
        );
        assert_eq!(PropertySchema::functional("href").map_key(), None);
    }

    #[test]
    fn test_accepts() {
        const UNITS: &[&str] = &["cm", "m"];
        let schema = PropertySchema::functional("units")
            .scalar(ScalarKind::Enumerated(UNITS))
            .iri();

        assert!(schema.accepts(&Slot::Scalar(Scalar::Enumerated("cm".into()))));
        assert!(!schema.accepts(&Slot::Scalar(Scalar::Enumerated("miles".into()))));
        assert!(!schema.accepts(&Slot::Scalar(Scalar::DateTime(DateTime::from_epoch_micros(0, 0)))));
        assert!(schema.accepts(&Slot::Reference(Iri::parse("https://example.com/u").unwrap())));
        assert!(schema.accepts(&Slot::Unknown(serde_json::json!({"x": 1}))));
    }

    #[test]
    fn test_accepts_rejects_shadowed_representations() {
        const UNITS: &[&str] = &["cm", "m"];
        let units = PropertySchema::functional("units")
            .scalar(ScalarKind::Enumerated(UNITS))
            .iri();
        // "cm" would come back as the token
        assert!(!units.accepts(&Slot::Reference(Iri::parse("cm").unwrap())));
        assert!(units.accepts(&Slot::Reference(Iri::parse("cms").unwrap())));

        let label = PropertySchema::functional("label").scalar(ScalarKind::String).iri();
        assert!(!label.accepts(&Slot::Reference(Iri::parse("https://example.com/a").unwrap())));
        assert!(label.accepts(&Slot::Scalar(Scalar::from("https://example.com/a"))));

        let count = PropertySchema::functional("count")
            .scalar(ScalarKind::NonNegativeInteger)
            .scalar(ScalarKind::Float);
        assert!(!count.accepts(&Slot::Scalar(Scalar::Float(3.0))));
        assert!(count.accepts(&Slot::Scalar(Scalar::Float(3.5))));
        assert!(count.accepts(&Slot::Scalar(Scalar::NonNegativeInteger(3))));
    }
}
