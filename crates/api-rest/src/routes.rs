//! HTTP routes of the draft service.

use crate::error::ApiError;
use crate::health::{HealthRes, HealthService};
use crate::middleware::{resolve_draft, DraftMiddleware};
use crate::session::establish_session;
use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::Json,
    routing::get,
    Extension, Router,
};
use draft_core::{
    deserialize_or_default, DraftResult, DraftStore, EncryptionSecrets, JsonDraftDocument,
    ResolvedDraft, ResolverConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub const CLAIM_DRAFT_TYPE: &str = "claim";
pub const RESPONSE_DRAFT_TYPE: &str = "response";

/// JSON view of the draft attached to a request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub key: String,
    pub id: u64,
    #[serde(rename = "type")]
    pub draft_type: String,
    pub persisted: bool,
    pub external_id: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub document: Option<JsonDraftDocument>,
    pub created: String,
    pub updated: String,
}

impl From<&ResolvedDraft<JsonDraftDocument>> for DraftView {
    fn from(resolved: &ResolvedDraft<JsonDraftDocument>) -> Self {
        let draft = resolved.draft();
        Self {
            key: resolved.key().to_string(),
            id: draft.id,
            draft_type: draft.draft_type.clone(),
            persisted: draft.is_persisted(),
            external_id: draft
                .document
                .as_ref()
                .and_then(|document| document.external_id.clone()),
            document: draft.document.clone(),
            created: draft.created.to_rfc3339(),
            updated: draft.updated.to_rfc3339(),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, claim_start, response_start),
    components(schemas(HealthRes, DraftView))
)]
pub struct ApiDoc;

/// Builds the REST application.
///
/// Each draft route gets its own resolution layer for its draft type; the session layer wraps
/// everything so the draft layers see the caller's login state.
///
/// # Errors
/// Returns an error if `limit` is zero.
pub fn router(
    store: Arc<dyn DraftStore>,
    limit: u32,
    secrets: EncryptionSecrets,
) -> DraftResult<Router> {
    let claim = DraftMiddleware::<JsonDraftDocument>::with_deserializer(
        store.clone(),
        ResolverConfig::new(CLAIM_DRAFT_TYPE, limit)?.with_secrets(secrets.clone()),
        deserialize_or_default,
    );
    let response = DraftMiddleware::<JsonDraftDocument>::with_deserializer(
        store,
        ResolverConfig::new(RESPONSE_DRAFT_TYPE, limit)?.with_secrets(secrets),
        deserialize_or_default,
    );

    let claim_routes = Router::new()
        .route("/claim/start", get(claim_start))
        .route_layer(from_fn_with_state(claim, resolve_draft::<JsonDraftDocument>));
    let response_routes = Router::new()
        .route("/response/:external_id/start", get(response_start))
        .route_layer(from_fn_with_state(
            response,
            resolve_draft::<JsonDraftDocument>,
        ));

    Ok(Router::new()
        .route("/health", get(health))
        .merge(claim_routes)
        .merge(response_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(from_fn(establish_session)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/claim/start",
    responses(
        (status = 200, description = "Claim draft of the caller", body = DraftView),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Draft store unavailable")
    )
)]
/// Returns the caller's claim draft, or an empty one if they have none.
async fn claim_start(
    draft: Option<Extension<ResolvedDraft<JsonDraftDocument>>>,
) -> Result<Json<DraftView>, ApiError> {
    view(draft)
}

#[utoipa::path(
    get,
    path = "/response/{external_id}/start",
    params(
        ("external_id" = String, Path, description = "External identifier of the claim being responded to")
    ),
    responses(
        (status = 200, description = "Response draft addressed by the identifier", body = DraftView),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Draft store unavailable")
    )
)]
/// Returns the caller's response draft for the identifier in the path.
///
/// An identifier that is not canonical is ignored, and the legacy single draft is returned.
async fn response_start(
    draft: Option<Extension<ResolvedDraft<JsonDraftDocument>>>,
) -> Result<Json<DraftView>, ApiError> {
    view(draft)
}

fn view(
    draft: Option<Extension<ResolvedDraft<JsonDraftDocument>>>,
) -> Result<Json<DraftView>, ApiError> {
    // The draft layer only attaches a draft for logged-in callers.
    let Extension(resolved) = draft.ok_or(ApiError::Unauthenticated)?;
    Ok(Json(DraftView::from(&resolved)))
}
