//! The ActivityStreams 2.0 vocabulary (core and extended types), as schema data.
//!
//! Includes the actor collections ActivityPub adds to the actor types.

use lazy_static::lazy_static;

use crate::registry::{RegistryBuilder, TypeRegistry};
use crate::schema::{Capability, PropertySchema, ScalarKind, TermSchema};

/// Tokens accepted by `Place.units` besides an IRI.
pub const PLACE_UNITS: &[&str] = &["cm", "feet", "inches", "km", "m", "miles"];

fn natural_language(name: &'static str) -> PropertySchema {
    PropertySchema::collection(name)
        .scalar(ScalarKind::String)
        .language_map()
}

fn relation(name: &'static str) -> PropertySchema {
    PropertySchema::collection(name).object_or_link()
}

fn date_time(name: &'static str) -> PropertySchema {
    PropertySchema::functional(name).scalar(ScalarKind::DateTime)
}

fn collection_ref(name: &'static str, capability: Capability) -> PropertySchema {
    PropertySchema::functional(name).iri().capability(capability)
}

fn page_ref(name: &'static str) -> PropertySchema {
    PropertySchema::functional(name)
        .iri()
        .capability(Capability::CollectionPage)
        .capability(Capability::Link)
}

fn float(name: &'static str) -> PropertySchema {
    PropertySchema::functional(name).scalar(ScalarKind::Float)
}

fn object_properties() -> Vec<PropertySchema> {
    vec![
        relation("attachment"),
        relation("attributedTo"),
        relation("audience"),
        relation("bcc"),
        relation("bto"),
        relation("cc"),
        natural_language("content"),
        relation("context"),
        PropertySchema::functional("duration").scalar(ScalarKind::Duration),
        date_time("endTime"),
        relation("generator"),
        PropertySchema::collection("icon")
            .iri()
            .capability(Capability::Image)
            .capability(Capability::Link),
        PropertySchema::collection("image")
            .iri()
            .capability(Capability::Image)
            .capability(Capability::Link),
        relation("inReplyTo"),
        relation("location"),
        PropertySchema::functional("mediaType").scalar(ScalarKind::MimeType),
        natural_language("name"),
        relation("preview"),
        date_time("published"),
        collection_ref("replies", Capability::Collection),
        date_time("startTime"),
        natural_language("summary"),
        relation("tag"),
        relation("to"),
        date_time("updated"),
        PropertySchema::collection("url").iri().capability(Capability::Link),
        collection_ref("likes", Capability::Collection),
        collection_ref("shares", Capability::Collection),
    ]
}

fn link_properties() -> Vec<PropertySchema> {
    vec![
        PropertySchema::functional("height").scalar(ScalarKind::NonNegativeInteger),
        PropertySchema::functional("href").iri(),
        PropertySchema::functional("hreflang").scalar(ScalarKind::LanguageTag),
        PropertySchema::functional("mediaType").scalar(ScalarKind::MimeType),
        natural_language("name"),
        relation("preview"),
        PropertySchema::collection("rel").scalar(ScalarKind::String),
        PropertySchema::functional("width").scalar(ScalarKind::NonNegativeInteger),
    ]
}

fn actor(name: &'static str) -> TermSchema {
    TermSchema::new(name).extends("Object").properties([
        collection_ref("inbox", Capability::OrderedCollection),
        collection_ref("outbox", Capability::OrderedCollection),
        collection_ref("following", Capability::Collection),
        collection_ref("followers", Capability::Collection),
        collection_ref("liked", Capability::Collection),
        PropertySchema::functional("preferredUsername")
            .scalar(ScalarKind::String)
            .language_map(),
        PropertySchema::collection("streams")
            .iri()
            .capability(Capability::Collection),
    ])
}

fn activity(name: &'static str, parent: &'static str) -> TermSchema {
    TermSchema::new(name).extends(parent)
}

/// Every ActivityStreams term, parents before children.
pub fn activity_streams_terms() -> Vec<TermSchema> {
    let mut terms = vec![
        TermSchema::new("Object")
            .capability(Capability::Object)
            .properties(object_properties()),
        TermSchema::new("Link")
            .capability(Capability::Link)
            .properties(link_properties()),
        TermSchema::new("Activity")
            .extends("Object")
            .capability(Capability::Activity)
            .properties(
                ["actor", "object", "target", "result", "origin", "instrument"]
                    .into_iter()
                    .map(relation),
            ),
        TermSchema::new("IntransitiveActivity")
            .extends("Activity")
            .capability(Capability::IntransitiveActivity)
            .without("object"),
        TermSchema::new("Collection")
            .extends("Object")
            .capability(Capability::Collection)
            .properties([
                PropertySchema::functional("totalItems").scalar(ScalarKind::NonNegativeInteger),
                page_ref("current"),
                page_ref("first"),
                page_ref("last"),
                relation("items"),
            ]),
        TermSchema::new("OrderedCollection")
            .extends("Collection")
            .capability(Capability::OrderedCollection)
            .property(relation("orderedItems"))
            .without("items"),
        TermSchema::new("CollectionPage")
            .extends("Collection")
            .capability(Capability::CollectionPage)
            .properties([
                PropertySchema::functional("partOf")
                    .iri()
                    .capability(Capability::Collection)
                    .capability(Capability::Link),
                page_ref("next"),
                page_ref("prev"),
            ]),
        TermSchema::new("OrderedCollectionPage")
            .extends("OrderedCollection")
            .extends("CollectionPage")
            .capability(Capability::OrderedCollectionPage)
            .property(PropertySchema::functional("startIndex").scalar(ScalarKind::NonNegativeInteger))
            .without("items"),
    ];

    terms.extend([
        activity("Accept", "Activity"),
        activity("TentativeAccept", "Accept"),
        activity("Add", "Activity"),
        activity("Arrive", "IntransitiveActivity"),
        activity("Create", "Activity"),
        activity("Delete", "Activity"),
        activity("Follow", "Activity"),
        activity("Ignore", "Activity"),
        activity("Block", "Ignore"),
        activity("Join", "Activity"),
        activity("Leave", "Activity"),
        activity("Like", "Activity"),
        activity("Dislike", "Activity"),
        activity("Offer", "Activity"),
        activity("Invite", "Offer"),
        activity("Reject", "Activity"),
        activity("TentativeReject", "Reject"),
        activity("Remove", "Activity"),
        activity("Undo", "Activity"),
        activity("Update", "Activity"),
        activity("View", "Activity"),
        activity("Listen", "Activity"),
        activity("Read", "Activity"),
        activity("Move", "Activity"),
        activity("Travel", "IntransitiveActivity"),
        activity("Announce", "Activity"),
        activity("Flag", "Activity"),
        TermSchema::new("Question")
            .extends("IntransitiveActivity")
            .properties([
                relation("oneOf"),
                relation("anyOf"),
                PropertySchema::collection("closed")
                    .scalar(ScalarKind::DateTime)
                    .scalar(ScalarKind::Boolean)
                    .object_or_link(),
            ]),
    ]);

    terms.extend(
        ["Application", "Group", "Organization", "Person", "Service"]
            .into_iter()
            .map(actor),
    );

    terms.extend([
        TermSchema::new("Article").extends("Object"),
        TermSchema::new("Document").extends("Object"),
        TermSchema::new("Audio").extends("Document"),
        TermSchema::new("Image")
            .extends("Document")
            .capability(Capability::Image),
        TermSchema::new("Video").extends("Document"),
        TermSchema::new("Page").extends("Document"),
        TermSchema::new("Note").extends("Object"),
        TermSchema::new("Event").extends("Object"),
        TermSchema::new("Place").extends("Object").properties([
            float("accuracy"),
            float("altitude"),
            float("latitude"),
            float("longitude"),
            float("radius"),
            PropertySchema::functional("units")
                .scalar(ScalarKind::Enumerated(PLACE_UNITS))
                .iri(),
        ]),
        TermSchema::new("Profile")
            .extends("Object")
            .property(collection_ref("describes", Capability::Object)),
        TermSchema::new("Relationship").extends("Object").properties([
            PropertySchema::functional("subject").object_or_link(),
            relation("object"),
            PropertySchema::collection("relationship")
                .iri()
                .capability(Capability::Object),
        ]),
        TermSchema::new("Tombstone").extends("Object").properties([
            PropertySchema::collection("formerType")
                .scalar(ScalarKind::String)
                .capability(Capability::Object),
            date_time("deleted"),
        ]),
        TermSchema::new("Mention").extends("Link"),
    ]);

    terms
}

/// A builder pre-loaded with the ActivityStreams vocabulary, to add
/// extension terms on top of it.
pub fn activity_streams_builder() -> RegistryBuilder {
    RegistryBuilder::from_registry(TypeRegistry::activity_streams())
}

lazy_static! {
    static ref ACTIVITY_STREAMS: TypeRegistry = TypeRegistry::builder()
        .register_all(activity_streams_terms())
        .expect("ActivityStreams vocabulary is well-formed")
        .build();
}

impl TypeRegistry {
    /// The shared ActivityStreams registry, built on first use.
    pub fn activity_streams() -> &'static TypeRegistry {
        &ACTIVITY_STREAMS
    }
}
