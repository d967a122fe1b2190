//! Internal implementation of the external identifier type.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

const CANONICAL_LEN: usize = 36;
const HYPHEN_OFFSETS: [usize; 4] = [8, 13, 18, 23];

/// Canonical external identifier (lowercase hyphenated 8-4-4-4-12 hex).
///
/// This wrapper type guarantees that once constructed, the contained value is in canonical
/// form. Comparing two `ExternalId`s, or an `ExternalId` against a stored string, is therefore
/// a plain string comparison.
///
/// # When to use this type
/// Use this wrapper whenever you are:
/// - Accepting an identifier from *outside* the core (request path, query, CLI input), or
/// - Tagging a draft document with the identifier it is addressed by.
///
/// # Construction
/// - [`ExternalId::parse`] validates an externally supplied identifier.
/// - [`extract_from`] finds an identifier inside a request path.
///
/// # Errors
/// [`ExternalId::parse`] returns [`UuidError::InvalidInput`] if the input is not already
/// canonical.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalId(String);

impl ExternalId {
    /// Validates and wraps an identifier string that must already be canonical.
    ///
    /// This does **not** normalise other common UUID forms (for example, uppercase or
    /// unhyphenated). Callers must provide the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(UuidError::InvalidInput(format!(
            "identifier must be 36 lowercase hex characters in 8-4-4-4-12 groups, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// This is a purely syntactic check:
    /// - Exactly 36 bytes long
    /// - Hyphens at offsets 8, 13, 18 and 23
    /// - Lowercase hex characters (`0-9` and `a-f`) everywhere else
    pub fn is_canonical(input: &str) -> bool {
        input.len() == CANONICAL_LEN
            && input.bytes().enumerate().all(|(i, b)| {
                if HYPHEN_OFFSETS.contains(&i) {
                    b == b'-'
                } else {
                    matches!(b, b'0'..=b'9' | b'a'..=b'f')
                }
            })
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExternalId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExternalId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ExternalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ExternalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExternalId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Extracts the external identifier from a raw request path.
///
/// The path is split on `/` (anything after `?` or `#` is ignored) and the first segment in
/// canonical form is returned. Paths without such a segment yield `None`; partially valid
/// segments are never reported.
///
/// # Examples
///
/// ```
/// use draft_uuid::extract_from;
///
/// let id = extract_from("/response/cec85062-8df0-4bcb-a1c5-b8b91e78a1d5/start");
/// assert_eq!(id.unwrap().as_str(), "cec85062-8df0-4bcb-a1c5-b8b91e78a1d5");
/// assert!(extract_from("/claim/start").is_none());
/// ```
pub fn extract_from(path: &str) -> Option<ExternalId> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .find(|segment| ExternalId::is_canonical(segment))
        .map(|segment| ExternalId(segment.to_owned()))
}
