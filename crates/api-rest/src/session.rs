//! Login state of the caller.
//!
//! Authentication happens upstream; by the time a request reaches this service it either carries
//! a bearer credential or it does not. [`establish_session`] records that as a [`Session`]
//! request extension. A request without the extension is treated as anonymous.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use draft_core::BearerToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    LoggedIn { bearer_token: BearerToken },
}

impl Session {
    /// Reads `Authorization: Bearer <token>`; anything else is anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map_or(Session::Anonymous, |token| Session::LoggedIn {
                bearer_token: BearerToken::new(token),
            })
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    pub fn bearer_token(&self) -> Option<&BearerToken> {
        match self {
            Session::LoggedIn { bearer_token } => Some(bearer_token),
            Session::Anonymous => None,
        }
    }
}

/// Middleware inserting the caller's [`Session`] into the request extensions.
pub async fn establish_session(mut request: Request, next: Next) -> Response {
    let session = Session::from_headers(request.headers());
    request.extensions_mut().insert(session);
    next.run(request).await
}
