use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::router;
use draft_core::{
    config::draft_limit_from_env_value, DraftStore, HttpDraftStore, InMemoryDraftStore,
    StoreConfig,
};

/// `RUST_LOG` plus info-level logging for the draft crates and the REST layer.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("draft=info".parse()?)
        .add_directive("api_rest=info".parse()?))
}

/// Main entry point for the draft service
///
/// Starts the REST server with a draft resolution layer on each draft route.
///
/// # Environment Variables
/// - `DRAFT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DRAFT_STORE_URL`: Base URL of the draft store (default: in-memory store)
/// - `DRAFT_STORE_SECRET_PRIMARY` / `DRAFT_STORE_SECRET_SECONDARY`: payload encryption secrets
/// - `DRAFT_SERVICE_TOKEN`: service-to-service token sent to the draft store
/// - `DRAFT_LIMIT`: maximum drafts fetched per resolution (default: 100)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DRAFT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let limit = draft_limit_from_env_value(std::env::var("DRAFT_LIMIT").ok())?;
    let store_config = StoreConfig::from_env_values(
        std::env::var("DRAFT_STORE_URL").ok(),
        std::env::var("DRAFT_STORE_SECRET_PRIMARY").ok(),
        std::env::var("DRAFT_STORE_SECRET_SECONDARY").ok(),
        std::env::var("DRAFT_SERVICE_TOKEN").ok(),
    )?;

    let store: Arc<dyn DraftStore> = match &store_config.url {
        Some(url) => {
            tracing::info!("++ Using draft store at {}", url);
            Arc::new(
                HttpDraftStore::new(url).with_service_token(store_config.service_token.clone()),
            )
        }
        None => {
            tracing::warn!("++ DRAFT_STORE_URL not set, using in-memory draft store");
            Arc::new(InMemoryDraftStore::default())
        }
    };

    let app = router(store, limit, store_config.secrets)?;

    tracing::info!("++ Starting draft REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_covers_core_and_rest_targets() {
        let filter = log_filter().unwrap().to_string();

        assert!(filter.contains("draft=info"));
        assert!(filter.contains("api_rest=info"));
    }
}
