//! # API REST
//!
//! REST surface of the draft service.
//!
//! Handles:
//! - Login state of the caller (`session`)
//! - Draft resolution middleware attaching one draft per request (`middleware`)
//! - HTTP endpoints with axum and OpenAPI/Swagger documentation (`routes`)
//! - Mapping failures to responses (`error`)
//!
//! Uses `draft-core` for the draft model, store access and resolution.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod session;

pub use error::ApiError;
pub use health::{HealthRes, HealthService};
pub use middleware::{resolve_draft, DeserializeFn, DraftMiddleware};
pub use routes::{router, ApiDoc, DraftView};
pub use session::{establish_session, Session};
