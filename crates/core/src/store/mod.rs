//! Draft store access.
//!
//! The resolver only ever *reads* from a store: fetch up to N drafts of one type belonging to
//! the caller identified by a bearer credential. Two implementations are provided:
//!
//! - [`HttpDraftStore`] talks to a remote draft store service over HTTP.
//! - [`InMemoryDraftStore`] keeps drafts in process, for local runs and tests.

mod http;
mod memory;

pub use http::HttpDraftStore;
pub use memory::InMemoryDraftStore;

use crate::config::EncryptionSecrets;
use crate::record::{DraftRecord, RawDraft};
use crate::DraftResult;
use serde_json::Value;
use std::fmt;
use std::num::NonZeroU32;

/// Bearer credential of the logged-in caller.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// What to fetch from the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraftQuery {
    pub draft_type: String,
    pub limit: NonZeroU32,
    pub secrets: EncryptionSecrets,
}

impl DraftQuery {
    /// The limit as sent on the wire.
    pub fn limit_param(&self) -> String {
        self.limit.to_string()
    }
}

/// Read access to persisted drafts.
#[async_trait::async_trait]
pub trait DraftStore: Send + Sync {
    /// Returns at most `query.limit` drafts of `query.draft_type` owned by `credential`.
    async fn find(&self, query: &DraftQuery, credential: &BearerToken)
        -> DraftResult<Vec<RawDraft>>;
}

/// Fetches drafts and deserializes each payload with `deserialize`.
///
/// A payload that fails to deserialize fails the whole fetch.
pub async fn find_drafts<S, D, F>(
    store: &S,
    query: &DraftQuery,
    credential: &BearerToken,
    deserialize: &F,
) -> DraftResult<Vec<DraftRecord<D>>>
where
    S: DraftStore + ?Sized,
    F: Fn(Option<Value>) -> DraftResult<Option<D>>,
{
    store
        .find(query, credential)
        .await?
        .into_iter()
        .map(|raw| raw.try_map_document(deserialize))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{deserialize_json, JsonDraftDocument};
    use crate::DraftError;
    use serde_json::json;

    fn query() -> DraftQuery {
        DraftQuery {
            draft_type: "claim".into(),
            limit: NonZeroU32::new(10).unwrap(),
            secrets: EncryptionSecrets::None,
        }
    }

    #[test]
    fn bearer_token_debug_is_redacted() {
        let token = BearerToken::new("user-jwt-token");

        assert!(!format!("{:?}", token).contains("user-jwt-token"));
        assert_eq!(token.as_str(), "user-jwt-token");
    }

    #[tokio::test]
    async fn find_drafts_deserializes_payloads() {
        let token = BearerToken::new("user-jwt-token");
        let store = InMemoryDraftStore::default().with_drafts(
            &token,
            vec![DraftRecord::placeholder("claim", Some(json!({ "externalId": "x" })))],
        );

        let drafts = find_drafts(&store, &query(), &token, &deserialize_json::<JsonDraftDocument>)
            .await
            .unwrap();

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].document.as_ref().unwrap().external_id.as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn find_drafts_fails_on_bad_payload() {
        let token = BearerToken::new("user-jwt-token");
        let store = InMemoryDraftStore::default().with_drafts(
            &token,
            vec![DraftRecord::placeholder("claim", Some(json!("not an object")))],
        );

        let result =
            find_drafts(&store, &query(), &token, &deserialize_json::<JsonDraftDocument>).await;

        assert!(matches!(result, Err(DraftError::Deserialization(_))));
    }
}
