//! Handler for short URL redirects.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use chrono::Utc;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// `GET /{code}` - resolves a short code and issues a 307 redirect.
///
/// Lookup order: redirect cache first, database on miss or cache error. The
/// cache TTL is capped at the link's remaining lifetime, so a cached entry
/// can never outlive its link's expiry. Hit counting and cache writes happen
/// in the background and never delay the redirect.
///
/// # Errors
///
/// - 404 for an unknown code
/// - 410 for an expired link
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let long_url = match state.cache.get_url(&code).await {
        Ok(Some(cached_url)) => cached_url,
        Ok(None) => resolve_and_cache(&state, &code).await?,
        Err(e) => {
            error!("Cache error for {}: {}", code, e);
            state.link_service.resolve(&code).await?.long_url
        }
    };

    let link_service = state.link_service.clone();
    tokio::spawn(async move {
        link_service.record_hit(&code).await;
    });

    Ok(Redirect::temporary(&long_url))
}

/// Database lookup with a background cache fill.
async fn resolve_and_cache(state: &AppState, code: &str) -> Result<String, AppError> {
    let link = state.link_service.resolve(code).await?;

    let ttl_seconds = match link.seconds_until_expiry(Utc::now()) {
        Some(remaining) => remaining.min(state.cache_ttl_seconds),
        None => state.cache_ttl_seconds,
    };

    debug!("Caching {} for {}s", code, ttl_seconds);

    let cache = state.cache.clone();
    let code = code.to_string();
    let long_url = link.long_url.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set_url(&code, &long_url, ttl_seconds).await {
            error!("Failed to cache URL for {}: {}", code, e);
        }
    });

    Ok(link.long_url)
}
