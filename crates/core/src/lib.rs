//! # Draft Core
//!
//! Core logic for resolving a user's in-progress draft.
//!
//! This crate contains the draft model and the decision procedure that picks one draft per
//! request:
//! - Draft records and document payloads (`record`, `document`)
//! - Read access to the draft store over HTTP or in memory (`store`)
//! - Resolution of the fetched drafts to exactly one (`resolver`)
//! - Startup configuration (`config`)
//!
//! **No HTTP server concerns**: request pipelines, sessions and response mapping belong in
//! `api-rest`.

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod record;
pub mod resolver;
pub mod store;

pub use config::{EncryptionSecrets, ResolverConfig, StoreConfig};
pub use document::{
    deserialize_json, deserialize_or_default, DraftDocument, ExternalIdState, JsonDraftDocument,
};
pub use error::{DraftError, DraftResult};
pub use record::{draft_key, DraftRecord, RawDraft, ResolvedDraft};
pub use resolver::{backfill_external_id, filter_by_external_id, select_latest, DraftResolver};
pub use store::{
    find_drafts, BearerToken, DraftQuery, DraftStore, HttpDraftStore, InMemoryDraftStore,
};

pub use draft_uuid::{extract_from, ExternalId};
