//! External identifier utilities.
//!
//! Drafts can be addressed by an *external identifier* embedded in the request path, for example
//! `/response/cec85062-8df0-4bcb-a1c5-b8b91e78a1d5/start`.
//!
//! To keep matching exact and consistent across the codebase, external identifiers use a
//! *canonical* UUID representation: **36 lowercase characters in 8-4-4-4-12 hexadecimal groups
//! separated by hyphens**.
//!
//! This module provides:
//! - A small wrapper type ([`ExternalId`]) that *guarantees* the canonical format once
//!   constructed.
//! - Path extraction ([`extract_from`]) that turns a raw request path into an optional
//!   identifier.
//!
//! ## Canonical form
//! - Length: 36
//! - Characters: `0-9`, `a-f` and `-` at offsets 8, 13, 18 and 23
//! - Example: `cec85062-8df0-4bcb-a1c5-b8b91e78a1d5`
//!
//! Non-canonical values (uppercase, simple/unhyphenated, braced, wrong length, non-hex) are
//! rejected rather than normalised. A path carrying one of those simply has no identifier.

mod service;

pub use service::{extract_from, ExternalId};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
