//! Draft resolution middleware.
//!
//! [`resolve_draft`] runs the [`DraftResolver`] for logged-in requests and inserts the resulting
//! [`ResolvedDraft`] into the request extensions, where handlers read it with
//! `Extension<ResolvedDraft<D>>`. Anonymous requests pass through untouched and the store is never
//! called for them.
//!
//! Install one layer per draft type:
//!
//! ```ignore
//! let claim = DraftMiddleware::new(store, ResolverConfig::new("claim", 100)?);
//! Router::new()
//!     .route("/claim/start", get(handler))
//!     .route_layer(from_fn_with_state(claim, resolve_draft::<JsonDraftDocument>));
//! ```

use crate::error::ApiError;
use crate::session::Session;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use draft_core::{
    deserialize_json, extract_from, DraftDocument, DraftResolver, DraftResult, DraftStore,
    ResolverConfig,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Maps a raw store payload to the document shape `D`.
pub type DeserializeFn<D> = fn(Option<Value>) -> DraftResult<Option<D>>;

/// State of one draft resolution layer.
pub struct DraftMiddleware<D> {
    store: Arc<dyn DraftStore>,
    resolver: DraftResolver,
    deserialize: DeserializeFn<D>,
}

impl<D> Clone for DraftMiddleware<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            resolver: self.resolver.clone(),
            deserialize: self.deserialize,
        }
    }
}

impl<D: DeserializeOwned> DraftMiddleware<D> {
    /// Layer state deserializing payloads with [`deserialize_json`].
    pub fn new(store: Arc<dyn DraftStore>, config: ResolverConfig) -> Self {
        Self::with_deserializer(store, config, deserialize_json::<D>)
    }
}

impl<D> DraftMiddleware<D> {
    pub fn with_deserializer(
        store: Arc<dyn DraftStore>,
        config: ResolverConfig,
        deserialize: DeserializeFn<D>,
    ) -> Self {
        Self {
            store,
            resolver: DraftResolver::new(config),
            deserialize,
        }
    }

    pub fn draft_type(&self) -> &str {
        self.resolver.config().draft_type()
    }
}

/// Resolves the caller's draft and attaches it to the request.
///
/// # Errors
/// A failed store fetch short-circuits the request with [`ApiError::Draft`]; the inner handler
/// is not called.
pub async fn resolve_draft<D>(
    State(middleware): State<DraftMiddleware<D>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    D: DraftDocument + Clone + Send + Sync + 'static,
{
    let credential = match request.extensions().get::<Session>() {
        Some(Session::LoggedIn { bearer_token }) => bearer_token.clone(),
        _ => return Ok(next.run(request).await),
    };

    let external_id = extract_from(request.uri().path());
    let resolved = middleware
        .resolver
        .resolve(
            middleware.store.as_ref(),
            &credential,
            external_id.as_ref(),
            middleware.deserialize,
        )
        .await?;

    tracing::debug!(
        key = resolved.key(),
        draft_id = resolved.draft().id,
        "attached draft to request"
    );
    request.extensions_mut().insert(resolved);
    Ok(next.run(request).await)
}
