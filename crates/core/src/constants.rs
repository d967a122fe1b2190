//! Constants used throughout the draft core crate.

/// Record id carried by a synthesized draft that has never been persisted.
pub const PLACEHOLDER_DRAFT_ID: u64 = 0;

/// Suffix appended to a draft type to form its request-scoped output key (`claim` -> `claimDraft`).
pub const DRAFT_KEY_SUFFIX: &str = "Draft";

/// Default cap on the number of drafts fetched per resolution.
pub const DEFAULT_DRAFT_LIMIT: u32 = 100;

/// Path of the draft collection on the remote draft store.
pub const DRAFTS_PATH: &str = "drafts";

/// Header carrying the payload encryption secrets to the draft store.
pub const SECRET_HEADER: &str = "Secret";

/// Header carrying the service-to-service token to the draft store.
pub const SERVICE_AUTHORIZATION_HEADER: &str = "ServiceAuthorization";
