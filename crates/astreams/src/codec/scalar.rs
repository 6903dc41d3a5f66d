//! Scalar encoding/decoding.
//!
//! A scalar decoder first checks the JSON kind. A kind mismatch means "not
//! this representation" (`Ok(None)`); a kind match with bad content is a
//! [`DecodeError::MalformedScalar`].

use serde_json::{Number, Value};

use crate::error::{DecodeError, EncodeError};
use crate::model::{DateTime, Duration, Scalar};
use crate::schema::ScalarKind;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes `raw` as a scalar of `kind`.
pub fn decode_scalar(raw: &Value, kind: ScalarKind) -> Result<Option<Scalar>, DecodeError> {
    let malformed = |reason: String| DecodeError::MalformedScalar {
        kind,
        value: raw.to_string(),
        reason,
    };

    let scalar = match (kind, raw) {
        (ScalarKind::Float, Value::Number(n)) => match n.as_f64() {
            Some(v) => Scalar::Float(v),
            None => return Err(malformed("not representable as f64".to_string())),
        },
        (ScalarKind::NonNegativeInteger, Value::Number(n)) => {
            Scalar::NonNegativeInteger(decode_non_negative(n).ok_or_else(|| {
                malformed("expected a non-negative integer".to_string())
            })?)
        }
        (ScalarKind::Boolean, Value::Bool(b)) => Scalar::Boolean(*b),
        (ScalarKind::String, Value::String(s)) => Scalar::String(s.clone()),
        (ScalarKind::LangString, Value::String(s)) => Scalar::LangString(s.clone()),
        (ScalarKind::DateTime, Value::String(s)) => {
            Scalar::DateTime(DateTime::parse(s).map_err(|e| malformed(e.message))?)
        }
        (ScalarKind::Duration, Value::String(s)) => {
            Scalar::Duration(Duration::parse(s).map_err(|e| malformed(e.message))?)
        }
        (ScalarKind::MimeType, Value::String(s)) => {
            if !is_mime_type(s) {
                return Err(malformed("expected type/subtype".to_string()));
            }
            Scalar::MimeType(s.clone())
        }
        (ScalarKind::LanguageTag, Value::String(s)) => {
            if !is_language_tag(s) {
                return Err(malformed("expected a BCP 47 language tag".to_string()));
            }
            Scalar::LanguageTag(s.clone())
        }
        (ScalarKind::Enumerated(domain), Value::String(s)) => {
            if !domain.contains(&s.as_str()) {
                return Err(malformed(format!("expected one of {domain:?}")));
            }
            Scalar::Enumerated(s.clone())
        }
        _ => return Ok(None),
    };
    Ok(Some(scalar))
}

/// Accepts integral floats such as `3.0`, which some producers emit.
fn decode_non_negative(n: &Number) -> Option<u64> {
    if let Some(v) = n.as_u64() {
        return Some(v);
    }
    let v = n.as_f64()?;
    // 2^53: beyond this f64 no longer holds every integer
    (v >= 0.0 && v.fract() == 0.0 && v <= 9_007_199_254_740_992.0).then_some(v as u64)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`{|}~".contains(c)
}

/// `type "/" subtype *( ";" parameter )`.
fn is_mime_type(s: &str) -> bool {
    let mut parts = s.split(';');
    let essence = parts.next().unwrap_or_default().trim();
    let Some((ty, subtype)) = essence.split_once('/') else {
        return false;
    };
    let token = |t: &str| !t.is_empty() && t.chars().all(is_token_char);
    if !token(ty) || !token(subtype) {
        return false;
    }
    parts.all(|param| {
        param
            .trim()
            .split_once('=')
            .is_some_and(|(name, value)| token(name.trim()) && !value.trim().is_empty())
    })
}

/// Alphanumeric subtags of 1-8 characters, the first alphabetic.
fn is_language_tag(s: &str) -> bool {
    let mut subtags = s.split('-');
    let primary = subtags.next().unwrap_or_default();
    let valid_len = |t: &str| (1..=8).contains(&t.len());
    valid_len(primary)
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && subtags.all(|t| valid_len(t) && t.chars().all(|c| c.is_ascii_alphanumeric()))
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a scalar in its canonical wire form.
pub fn encode_scalar(scalar: &Scalar) -> Result<Value, EncodeError> {
    Ok(match scalar {
        Scalar::Float(v) => {
            let n = Number::from_f64(*v).ok_or(EncodeError::NonFiniteFloat { value: *v })?;
            Value::Number(n)
        }
        Scalar::NonNegativeInteger(v) => Value::from(*v),
        Scalar::Boolean(b) => Value::Bool(*b),
        Scalar::String(s)
        | Scalar::LangString(s)
        | Scalar::MimeType(s)
        | Scalar::LanguageTag(s)
        | Scalar::Enumerated(s) => Value::String(s.clone()),
        Scalar::DateTime(dt) => Value::String(dt.to_string()),
        Scalar::Duration(d) => Value::String(d.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_kind_mismatch_is_not_an_error() {
        assert_eq!(decode_scalar(&json!("5"), ScalarKind::Float), Ok(None));
        assert_eq!(decode_scalar(&json!(5), ScalarKind::String), Ok(None));
        assert_eq!(decode_scalar(&json!(null), ScalarKind::Boolean), Ok(None));
        assert_eq!(decode_scalar(&json!({"a": 1}), ScalarKind::DateTime), Ok(None));
    }

    #[test]
    fn test_decode_float() {
        assert_eq!(decode_scalar(&json!(5.0), ScalarKind::Float), Ok(Some(Scalar::Float(5.0))));
        assert_eq!(decode_scalar(&json!(-2), ScalarKind::Float), Ok(Some(Scalar::Float(-2.0))));
    }

    #[test]
    fn test_decode_non_negative_integer() {
        let kind = ScalarKind::NonNegativeInteger;
        assert_eq!(decode_scalar(&json!(42), kind), Ok(Some(Scalar::NonNegativeInteger(42))));
        assert_eq!(decode_scalar(&json!(3.0), kind), Ok(Some(Scalar::NonNegativeInteger(3))));
        for bad in [json!(-1), json!(1.5)] {
            let err = decode_scalar(&bad, kind).unwrap_err();
            assert_eq!(err.code(), ErrorCode::MalformedScalar);
        }
    }

    #[test]
    fn test_decode_datetime() {
        let decoded = decode_scalar(&json!("2024-01-15T10:30:00Z"), ScalarKind::DateTime).unwrap();
        assert_eq!(decoded.unwrap().as_datetime().unwrap().to_string(), "2024-01-15T10:30:00Z");

        let err = decode_scalar(&json!("last tuesday"), ScalarKind::DateTime).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedScalar { kind: ScalarKind::DateTime, .. }));
    }

    #[test]
    fn test_decode_duration() {
        let decoded = decode_scalar(&json!("PT2H30M"), ScalarKind::Duration).unwrap().unwrap();
        assert_eq!(decoded.as_duration().unwrap().parts().minutes, 30);
        assert!(decode_scalar(&json!("2 hours"), ScalarKind::Duration).is_err());
    }

    #[test]
    fn test_mime_types() {
        for ok in ["text/html", "image/svg+xml", "application/ld+json; profile=\"https://www.w3.org/ns/activitystreams\""] {
            assert!(is_mime_type(ok), "{ok}");
        }
        for bad in ["html", "text/", "/html", "text/html; charset", "text html/x"] {
            assert!(!is_mime_type(bad), "{bad}");
        }
    }

    #[test]
    fn test_language_tags() {
        for ok in ["en", "en-US", "zh-Hant-TW", "sr-Latn-RS", "de-CH-1996"] {
            assert!(is_language_tag(ok), "{ok}");
        }
        for bad in ["", "e n", "englishlanguage", "en_US", "1en", "en-"] {
            assert!(!is_language_tag(bad), "{bad}");
        }
    }

    #[test]
    fn test_decode_enumerated() {
        const DOMAIN: &[&str] = &["cm", "m"];
        let kind = ScalarKind::Enumerated(DOMAIN);
        assert_eq!(decode_scalar(&json!("cm"), kind), Ok(Some(Scalar::Enumerated("cm".into()))));
        assert!(decode_scalar(&json!("parsecs"), kind).is_err());
    }

    #[test]
    fn test_encode_rejects_non_finite() {
        assert_eq!(
            encode_scalar(&Scalar::Float(f64::INFINITY)),
            Err(EncodeError::NonFiniteFloat { value: f64::INFINITY })
        );
    }

    proptest! {
        #[test]
        fn test_float_roundtrip(v in proptest::num::f64::NORMAL | proptest::num::f64::ZERO) {
            let encoded = encode_scalar(&Scalar::Float(v)).unwrap();
            prop_assert_eq!(decode_scalar(&encoded, ScalarKind::Float).unwrap(), Some(Scalar::Float(v)));
        }

        #[test]
        fn test_datetime_roundtrip(secs in 0i64..4_102_444_800i64, offset in -720i16..=840) {
            let dt = DateTime::from_epoch_micros(secs * 1_000_000, offset);
            let encoded = encode_scalar(&Scalar::DateTime(dt)).unwrap();
            prop_assert_eq!(decode_scalar(&encoded, ScalarKind::DateTime).unwrap(), Some(Scalar::DateTime(dt)));
        }
    }
}
