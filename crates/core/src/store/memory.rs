use super::{BearerToken, DraftQuery, DraftStore};
use crate::record::RawDraft;
use crate::DraftResult;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process draft store keyed by the owner's bearer credential.
///
/// Drafts are returned in insertion order, filtered by type and capped at the query limit.
#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: RwLock<HashMap<BearerToken, Vec<RawDraft>>>,
}

impl InMemoryDraftStore {
    /// Seeds drafts for `owner` while the store is still exclusively owned.
    pub fn with_drafts(mut self, owner: &BearerToken, drafts: Vec<RawDraft>) -> Self {
        self.drafts
            .get_mut()
            .entry(owner.clone())
            .or_default()
            .extend(drafts);
        self
    }

    pub async fn insert(&self, owner: &BearerToken, draft: RawDraft) {
        self.drafts
            .write()
            .await
            .entry(owner.clone())
            .or_default()
            .push(draft);
    }

    /// Number of drafts stored for `owner`, across all types.
    pub async fn count(&self, owner: &BearerToken) -> usize {
        self.drafts.read().await.get(owner).map_or(0, Vec::len)
    }
}

#[async_trait::async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn find(
        &self,
        query: &DraftQuery,
        credential: &BearerToken,
    ) -> DraftResult<Vec<RawDraft>> {
        let drafts = self.drafts.read().await;
        let found: Vec<RawDraft> = drafts
            .get(credential)
            .map(|owned| {
                owned
                    .iter()
                    .filter(|draft| draft.draft_type == query.draft_type)
                    .take(query.limit.get() as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            draft_type = %query.draft_type,
            found = found.len(),
            "in-memory draft lookup"
        );
        Ok(found)
    }
}
