//! HTTP client for the remote draft store service.

use super::{BearerToken, DraftQuery, DraftStore};
use crate::constants::{DRAFTS_PATH, SECRET_HEADER, SERVICE_AUTHORIZATION_HEADER};
use crate::record::{DraftRecord, RawDraft};
use crate::{DraftError, DraftResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Draft store reached over HTTP.
///
/// Lists drafts with `GET {base_url}/drafts?type=<type>&limit=<n>`, authenticating the user with
/// their bearer token and, when configured, the calling service with a `ServiceAuthorization`
/// token. Encryption secrets travel in the `Secret` header.
#[derive(Clone, Debug)]
pub struct HttpDraftStore {
    client: reqwest::Client,
    base_url: String,
    service_token: Option<String>,
}

#[derive(Deserialize)]
struct DraftPage {
    data: Vec<WireDraft>,
}

#[derive(Deserialize)]
struct WireDraft {
    id: WireId,
    #[serde(rename = "type")]
    draft_type: String,
    #[serde(default)]
    document: Option<Value>,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
}

/// The store has served ids both as numbers and as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl WireDraft {
    fn into_raw(self) -> DraftResult<RawDraft> {
        let id = match self.id {
            WireId::Number(id) => id,
            WireId::Text(text) => text
                .parse()
                .map_err(|_| DraftError::StoreData(format!("non-numeric draft id '{text}'")))?,
        };

        Ok(DraftRecord {
            id,
            draft_type: self.draft_type,
            document: self.document,
            created: self.created,
            updated: self.updated,
        })
    }
}

impl HttpDraftStore {
    /// Create a client for the draft store at `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_token: None,
        }
    }

    pub fn with_service_token(mut self, service_token: Option<String>) -> Self {
        self.service_token = service_token;
        self
    }

    fn request(
        &self,
        query: &DraftQuery,
        credential: &BearerToken,
    ) -> DraftResult<reqwest::Request> {
        let url = format!("{}/{}", self.base_url, DRAFTS_PATH);
        let mut builder = self
            .client
            .get(url)
            .query(&[
                ("type", query.draft_type.clone()),
                ("limit", query.limit_param()),
            ])
            .bearer_auth(credential.as_str());

        if let Some(token) = &self.service_token {
            builder = builder.header(SERVICE_AUTHORIZATION_HEADER, format!("Bearer {token}"));
        }
        if let Some(secret) = query.secrets.header_value() {
            builder = builder.header(SECRET_HEADER, secret);
        }

        builder.build().map_err(DraftError::StoreRequest)
    }
}

#[async_trait::async_trait]
impl DraftStore for HttpDraftStore {
    async fn find(
        &self,
        query: &DraftQuery,
        credential: &BearerToken,
    ) -> DraftResult<Vec<RawDraft>> {
        let request = self.request(query, credential)?;

        info!(url = %request.url(), "fetching drafts from draft store");
        let resp = self
            .client
            .execute(request)
            .await
            .map_err(DraftError::StoreRequest)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DraftError::StoreStatus {
                status: status.as_u16(),
                body,
            });
        }

        let page: DraftPage = resp.json().await.map_err(DraftError::StoreResponse)?;
        let drafts = page
            .data
            .into_iter()
            .map(WireDraft::into_raw)
            .collect::<DraftResult<Vec<_>>>()?;
        info!(count = drafts.len(), "fetched drafts");
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncryptionSecrets;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::num::NonZeroU32;

    fn query(secrets: EncryptionSecrets) -> DraftQuery {
        DraftQuery {
            draft_type: "claim".into(),
            limit: NonZeroU32::new(100).unwrap(),
            secrets,
        }
    }

    /// Serves `app` on an ephemeral local port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn find_maps_error_status_to_store_status() {
        let app = Router::new().route(
            "/drafts",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "store is down") }),
        );
        let store = HttpDraftStore::new(serve(app).await);

        let err = store
            .find(&query(EncryptionSecrets::None), &BearerToken::new("user-jwt-token"))
            .await
            .unwrap_err();

        assert!(err.is_store_failure());
        match err {
            DraftError::StoreStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "store is down");
            }
            other => panic!("expected StoreStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_reads_data_page_in_order() {
        let app = Router::new().route(
            "/drafts",
            get(|| async {
                Json(json!({
                    "data": [
                        {
                            "id": 3,
                            "type": "claim",
                            "document": { "externalId": "cec85062-8df0-4bcb-a1c5-b8b91e78a1d5" },
                            "created": "2026-10-01T09:00:00Z",
                            "updated": "2026-10-03T09:00:00Z"
                        },
                        {
                            "id": "4",
                            "type": "claim",
                            "created": "2026-10-02T09:00:00Z",
                            "updated": "2026-10-02T10:00:00Z"
                        }
                    ]
                }))
            }),
        );
        let store = HttpDraftStore::new(serve(app).await);

        let drafts = store
            .find(&query(EncryptionSecrets::None), &BearerToken::new("user-jwt-token"))
            .await
            .unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].id, 3);
        assert_eq!(drafts[1].id, 4);
        assert!(drafts.iter().all(|draft| draft.draft_type == "claim"));
        assert_eq!(drafts[0].created.to_rfc3339(), "2026-10-01T09:00:00+00:00");
        assert_eq!(drafts[0].updated.to_rfc3339(), "2026-10-03T09:00:00+00:00");
        assert_eq!(drafts[1].updated.to_rfc3339(), "2026-10-02T10:00:00+00:00");
        assert_eq!(
            drafts[0].document,
            Some(json!({ "externalId": "cec85062-8df0-4bcb-a1c5-b8b91e78a1d5" }))
        );
        assert!(drafts[1].document.is_none());
    }

    #[test]
    fn store_trims_trailing_slash() {
        let store = HttpDraftStore::new("http://localhost:8800/");
        assert_eq!(store.base_url, "http://localhost:8800");
    }

    #[test]
    fn request_carries_query_and_user_token() {
        let store = HttpDraftStore::new("http://localhost:8800");
        let request = store
            .request(&query(EncryptionSecrets::None), &BearerToken::new("user-jwt-token"))
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:8800/drafts?type=claim&limit=100"
        );
        assert_eq!(
            request.headers()["authorization"].to_str().unwrap(),
            "Bearer user-jwt-token"
        );
        assert!(request.headers().get(SECRET_HEADER).is_none());
        assert!(request.headers().get(SERVICE_AUTHORIZATION_HEADER).is_none());
    }

    #[test]
    fn request_carries_secrets_and_service_token() {
        let store = HttpDraftStore::new("http://localhost:8800")
            .with_service_token(Some("s2s-token".into()));
        let secrets = EncryptionSecrets::Secrets {
            primary: "primary".into(),
            secondary: Some("secondary".into()),
        };
        let request = store
            .request(&query(secrets), &BearerToken::new("user-jwt-token"))
            .unwrap();

        assert_eq!(
            request.headers()[SECRET_HEADER].to_str().unwrap(),
            "primary,secondary"
        );
        assert_eq!(
            request.headers()[SERVICE_AUTHORIZATION_HEADER]
                .to_str()
                .unwrap(),
            "Bearer s2s-token"
        );
    }

    #[test]
    fn page_accepts_numeric_and_string_ids() {
        let page: DraftPage = serde_json::from_str(
            r#"{
                "data": [
                    { "id": 7, "type": "claim", "document": {}, "created": "2026-10-01T09:00:00Z", "updated": "2026-10-01T09:00:00Z" },
                    { "id": "8", "type": "claim", "created": "2026-10-01T09:00:00Z", "updated": "2026-10-02T09:00:00Z" }
                ]
            }"#,
        )
        .unwrap();

        let drafts = page
            .data
            .into_iter()
            .map(WireDraft::into_raw)
            .collect::<DraftResult<Vec<_>>>()
            .unwrap();

        assert_eq!(drafts[0].id, 7);
        assert_eq!(drafts[1].id, 8);
        assert!(drafts[1].document.is_none());
    }

    #[test]
    fn page_rejects_non_numeric_id() {
        let wire: WireDraft = serde_json::from_str(
            r#"{ "id": "abc", "type": "claim", "created": "2026-10-01T09:00:00Z", "updated": "2026-10-01T09:00:00Z" }"#,
        )
        .unwrap();

        let result = wire.into_raw();

        assert!(matches!(result, Err(DraftError::StoreData(_))));
        assert!(result.unwrap_err().is_store_failure());
    }
}
