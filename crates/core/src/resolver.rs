//! Draft resolution.
//!
//! Every request that works on a draft needs exactly one of them. The store, however, may hold
//! zero or several drafts of the requested type for the caller:
//!
//! - **Legacy drafts** predate external identifiers; a user had at most one draft per type and
//!   none of them carry an `externalId`.
//! - **Tagged drafts** carry the `externalId` the request path addresses them by.
//! - **Duplicates** appear when concurrent requests each synthesize and persist a draft.
//!
//! [`DraftResolver::resolve`] reduces whatever the store returns to a single [`ResolvedDraft`]:
//!
//! 1. fetch up to `limit` drafts of the configured type,
//! 2. narrow them to the requested external identifier ([`filter_by_external_id`]),
//! 3. pick the most recently updated one ([`select_latest`]) or synthesize a placeholder,
//! 4. tag an untagged document with the requested identifier ([`backfill_external_id`]).
//!
//! Only store failures are reported as errors. Several matching drafts are not an error; the
//! latest `updated` wins.

use crate::config::ResolverConfig;
use crate::document::DraftDocument;
use crate::record::{DraftRecord, ResolvedDraft};
use crate::store::{find_drafts, BearerToken, DraftStore};
use crate::DraftResult;
use draft_uuid::ExternalId;
use serde_json::Value;
use tracing::{debug, warn};

/// Narrows fetched drafts to those addressed by `external_id`.
///
/// If no draft carries any external identifier the drafts are legacy and are returned
/// unchanged, so the old one-draft-per-type convention still finds them and they can be tagged.
/// Otherwise only drafts tagged with exactly `external_id` are kept, which may leave none.
pub fn filter_by_external_id<D: DraftDocument>(
    drafts: Vec<DraftRecord<D>>,
    external_id: &ExternalId,
) -> Vec<DraftRecord<D>> {
    if !drafts.iter().any(|draft| draft.external_id().is_present()) {
        return drafts;
    }

    drafts
        .into_iter()
        .filter(|draft| draft.external_id().matches(external_id))
        .collect()
}

/// Picks the draft with the latest `updated` timestamp.
///
/// The first draft is the initial candidate and is only replaced by a strictly later one, so
/// ties keep the earliest draft in fetch order. Returns `None` for an empty list.
pub fn select_latest<D>(drafts: Vec<DraftRecord<D>>) -> Option<DraftRecord<D>> {
    let mut drafts = drafts.into_iter();
    let first = drafts.next()?;
    Some(drafts.fold(first, |latest, draft| {
        if draft.updated > latest.updated {
            draft
        } else {
            latest
        }
    }))
}

/// Tags the draft's document with `external_id` when it has a document without one.
///
/// An existing identifier is never overwritten. Returns whether the document was changed.
pub fn backfill_external_id<D: DraftDocument>(
    draft: &mut DraftRecord<D>,
    external_id: Option<&ExternalId>,
) -> bool {
    let Some(external_id) = external_id else {
        return false;
    };
    match draft.document.as_mut() {
        Some(document) if !document.external_id().is_present() => {
            document.assign_external_id(external_id);
            true
        }
        _ => false,
    }
}

/// Resolves the draft of one type for each request.
#[derive(Clone, Debug)]
pub struct DraftResolver {
    config: ResolverConfig,
}

impl DraftResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Fetches the caller's drafts and reduces them to exactly one.
    ///
    /// `deserialize` maps a raw payload to the document shape; it is applied to every fetched
    /// draft and called with `None` to build the document of a synthesized placeholder.
    ///
    /// The returned draft may carry a backfilled external identifier. Nothing is written back
    /// to the store.
    ///
    /// # Errors
    /// Returns the store's error unchanged when the fetch fails, or
    /// [`crate::DraftError::Deserialization`] when `deserialize` rejects a payload.
    pub async fn resolve<S, D, F>(
        &self,
        store: &S,
        credential: &BearerToken,
        external_id: Option<&ExternalId>,
        deserialize: F,
    ) -> DraftResult<ResolvedDraft<D>>
    where
        S: DraftStore + ?Sized,
        D: DraftDocument,
        F: Fn(Option<Value>) -> DraftResult<Option<D>>,
    {
        let draft_type = self.config.draft_type();
        let mut drafts =
            find_drafts(store, &self.config.query(), credential, &deserialize).await?;
        let fetched = drafts.len();

        if let Some(external_id) = external_id {
            drafts = filter_by_external_id(drafts, external_id);
        }
        if drafts.len() > 1 {
            warn!(
                draft_type,
                count = drafts.len(),
                "multiple drafts matched, using the most recently updated"
            );
        }

        let mut draft = match select_latest(drafts) {
            Some(draft) => draft,
            None => DraftRecord::placeholder(draft_type, deserialize(None)?),
        };

        let backfilled = backfill_external_id(&mut draft, external_id);
        debug!(
            draft_type,
            fetched,
            draft_id = draft.id,
            backfilled,
            "resolved draft"
        );

        Ok(ResolvedDraft::new(draft))
    }
}
