//! IRI references.
//!
//! Identifiers are kept as written. Parsing only checks the syntax needed to
//! tell an identifier apart from free text; no normalization or resolution
//! against a base is performed.

use std::fmt;

/// Error type for IRI parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct IriParseError {
    pub message: String,
}

impl IriParseError {
    fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// An absolute IRI or a relative reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Parses an IRI reference.
    ///
    /// Rejects empty input, whitespace, control characters, characters that
    /// are never legal in an IRI, malformed percent escapes and a leading
    /// `scheme:` that is not a valid scheme.
    pub fn parse(s: &str) -> Result<Iri, IriParseError> {
        if s.is_empty() {
            return Err(IriParseError::new("empty IRI"));
        }

        let bytes = s.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'%' => {
                    let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
                    if !valid {
                        return Err(IriParseError::new(format!("malformed percent escape in {s:?}")));
                    }
                    i += 3;
                    continue;
                }
                b'<' | b'>' | b'"' | b'{' | b'}' | b'|' | b'\\' | b'^' | b'`' => {
                    return Err(IriParseError::new(format!("illegal character in {s:?}")));
                }
                _ => {}
            }
            i += 1;
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(IriParseError::new(format!("whitespace or control character in {s:?}")));
        }

        // A colon before the first delimiter must end a scheme
        let head_end = s.find(['/', '?', '#']).unwrap_or(s.len());
        if let Some(colon) = s[..head_end].find(':') {
            if !is_scheme(&s[..colon]) {
                return Err(IriParseError::new(format!("invalid scheme in {s:?}")));
            }
        }

        Ok(Iri(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scheme, if this is an absolute IRI.
    pub fn scheme(&self) -> Option<&str> {
        let head_end = self.0.find(['/', '?', '#']).unwrap_or(self.0.len());
        self.0[..head_end].find(':').map(|colon| &self.0[..colon])
    }

    pub fn is_absolute(&self) -> bool {
        self.scheme().is_some()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Iri {
    type Err = IriParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iri::parse(s)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
