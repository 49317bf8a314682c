//! Shared application state injected into handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{LinkService, RateLimitService};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::PgLinkRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub rate_limiter: Arc<RateLimitService>,
    pub cache: Arc<dyn CacheService>,
    /// Public base URL used to render `short_url` in responses.
    pub base_url: String,
    /// Default TTL for cached redirects; capped at link expiry per entry.
    pub cache_ttl_seconds: u64,
    /// Trust X-Forwarded-For / X-Real-IP for rate-limit client identity.
    pub behind_proxy: bool,
}
