//! Error types for decoding, encoding and building vocabulary entities.

use thiserror::Error;

use crate::schema::ScalarKind;

/// Error codes grouping decode failures by cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Document is not shaped like an entity
    MalformedDocument,
    /// E002: A scalar's JSON kind matched but its content did not parse
    MalformedScalar,
    /// E003: A recognized embedded type failed to decode
    MalformedEmbedded,
    /// E004: A resource limit was exceeded
    LimitExceeded,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MalformedDocument => "E001",
            ErrorCode::MalformedScalar => "E002",
            ErrorCode::MalformedEmbedded => "E003",
            ErrorCode::LimitExceeded => "E004",
        }
    }
}

/// Error during JSON decoding.
///
/// Values that match no accepted representation are not errors; they are
/// kept as unknown slots. These variants cover data that was recognized
/// and then found to be broken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Malformed document ===
    #[error("[E001] invalid JSON: {0}")]
    InvalidJson(String),

    #[error("[E001] expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("[E001] no registered type among {types:?}")]
    UnhandledType { types: Vec<String> },

    #[error("[E001] id is not a valid IRI: {value}")]
    MalformedId { value: String },

    // === E002: Malformed scalar ===
    #[error("[E002] malformed {kind} value {value:?}: {reason}")]
    MalformedScalar {
        kind: ScalarKind,
        value: String,
        reason: String,
    },

    // === E003: Malformed embedded ===
    #[error("[E003] embedded {type_name} failed to decode: {source}")]
    MalformedEmbedded {
        type_name: String,
        #[source]
        source: Box<DecodeError>,
    },

    // === E004: Limits ===
    #[error("[E004] nesting depth exceeds maximum {max}")]
    NestingTooDeep { max: usize },

    /// Wraps any error raised while decoding one property.
    #[error("in property {property}: {source}")]
    InProperty {
        property: String,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Returns the error code for this error, looking through property context.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::InvalidJson(_)
            | DecodeError::NotAnObject { .. }
            | DecodeError::UnhandledType { .. }
            | DecodeError::MalformedId { .. } => ErrorCode::MalformedDocument,
            DecodeError::MalformedScalar { .. } => ErrorCode::MalformedScalar,
            DecodeError::MalformedEmbedded { .. } => ErrorCode::MalformedEmbedded,
            DecodeError::NestingTooDeep { .. } => ErrorCode::LimitExceeded,
            DecodeError::InProperty { source, .. } => source.code(),
        }
    }

    pub(crate) fn in_property(property: &str, source: DecodeError) -> Self {
        DecodeError::InProperty {
            property: property.to_string(),
            source: Box::new(source),
        }
    }
}

/// Error during JSON encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("float value {value} is not finite")]
    NonFiniteFloat { value: f64 },

    #[error("in property {property}: {source}")]
    InProperty {
        property: String,
        #[source]
        source: Box<EncodeError>,
    },
}

impl EncodeError {
    pub(crate) fn in_property(property: &str, source: EncodeError) -> Self {
        EncodeError::InProperty {
            property: property.to_string(),
            source: Box::new(source),
        }
    }
}

/// Error when setting a property through an entity accessor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("{term} has no property {property}")]
    UnknownProperty { term: String, property: String },

    #[error("{term}.{property} is functional and holds at most one value")]
    NotCollection { term: String, property: String },

    #[error("{term}.{property} has no natural-language map")]
    NotLanguageMappable { term: String, property: String },

    #[error("{term}.{property} does not accept this representation")]
    RepresentationNotAccepted { term: String, property: String },

    #[error("{key} is not an extension key on {term}")]
    ReservedKey { term: String, key: String },

    #[error("no registered type {name}")]
    UnknownType { name: String },
}

/// Error while registering vocabulary terms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("type {name} is already registered")]
    DuplicateType { name: String },

    #[error("type {name} extends unregistered type {parent}")]
    UnknownParent { name: String, parent: String },

    #[error("type {name} declares property {property} twice")]
    DuplicateProperty { name: String, property: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DecodeError::NotAnObject { found: "array" }.code().code(), "E001");
        assert_eq!(DecodeError::NestingTooDeep { max: 64 }.code(), ErrorCode::LimitExceeded);
    }

    #[test]
    fn test_code_looks_through_property_context() {
        let err = DecodeError::in_property(
            "published",
            DecodeError::MalformedScalar {
                kind: ScalarKind::DateTime,
                value: "yesterday".to_string(),
                reason: "too short".to_string(),
            },
        );
        assert_eq!(err.code(), ErrorCode::MalformedScalar);
        assert!(err.to_string().starts_with("in property published: [E002]"));
    }
}
