//! Draft records as returned by the store and handed to request handlers.

use crate::constants::{DRAFT_KEY_SUFFIX, PLACEHOLDER_DRAFT_ID};
use crate::document::{DraftDocument, ExternalIdState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A draft with a document of shape `D`.
///
/// `id == 0` marks a placeholder synthesized for this request; such a record has never been
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord<D> {
    pub id: u64,
    #[serde(rename = "type")]
    pub draft_type: String,
    #[serde(default)]
    pub document: Option<D>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// A draft exactly as the store returned it, payload not yet deserialized.
pub type RawDraft = DraftRecord<Value>;

impl<D> DraftRecord<D> {
    /// A fresh, unpersisted draft stamped with the current time.
    pub fn placeholder(draft_type: impl Into<String>, document: Option<D>) -> Self {
        let now = Utc::now();
        Self {
            id: PLACEHOLDER_DRAFT_ID,
            draft_type: draft_type.into(),
            document,
            created: now,
            updated: now,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != PLACEHOLDER_DRAFT_ID
    }

    /// Replaces the document through a fallible conversion, keeping every other field.
    pub fn try_map_document<E, T, F>(self, f: F) -> Result<DraftRecord<T>, E>
    where
        F: FnOnce(Option<D>) -> Result<Option<T>, E>,
    {
        Ok(DraftRecord {
            id: self.id,
            draft_type: self.draft_type,
            document: f(self.document)?,
            created: self.created,
            updated: self.updated,
        })
    }
}

impl<D: DraftDocument> DraftRecord<D> {
    /// External identifier state of the document; a record without a document is untagged.
    pub fn external_id(&self) -> ExternalIdState<'_> {
        self.document
            .as_ref()
            .map_or(ExternalIdState::Absent, |document| document.external_id())
    }
}

/// Request-scoped output key for a draft type (`claim` -> `claimDraft`).
pub fn draft_key(draft_type: &str) -> String {
    format!("{draft_type}{DRAFT_KEY_SUFFIX}")
}

/// The single draft chosen for a request.
///
/// Inserted into the request extensions by the draft middleware; downstream handlers read it
/// with `Extension<ResolvedDraft<D>>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDraft<D> {
    key: String,
    draft: DraftRecord<D>,
}

impl<D> ResolvedDraft<D> {
    pub fn new(draft: DraftRecord<D>) -> Self {
        Self {
            key: draft_key(&draft.draft_type),
            draft,
        }
    }

    /// Output key derived from the draft type.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn draft(&self) -> &DraftRecord<D> {
        &self.draft
    }
}
