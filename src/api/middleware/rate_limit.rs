//! Per-IP rate limiting middleware.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::net::SocketAddr;
use tracing::{error, warn};

use crate::application::services::Decision;
use crate::error::AppError;
use crate::state::AppState;

/// Applies the fixed-window rate limit to every request.
///
/// The client identity is the peer socket address, or the forwarding headers
/// when the service is configured as running behind a trusted proxy. A
/// denial maps to 429. If the counter store itself fails the request is
/// rejected with 500 rather than let an infrastructure outage disable the
/// limit.
pub async fn layer(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = client_ip(request.headers(), addr, state.behind_proxy);

    match state.rate_limiter.check_and_increment(&client_ip).await {
        Ok(Decision::Allowed) => Ok(next.run(request).await),
        Ok(Decision::Denied) => {
            warn!("Rate limit exceeded for {}", client_ip);
            Err(AppError::too_many_requests(
                "Too many requests",
                json!({ "limit_per_window": state.rate_limiter.limit() }),
            ))
        }
        // Fail closed: an unavailable store must not become an open gate.
        Err(e) => {
            error!("Rate limiter store error for {}: {}", client_ip, e);
            Err(AppError::internal("Rate limiting unavailable", json!({})))
        }
    }
}

/// Extracts the client IP, honoring `X-Forwarded-For` / `X-Real-IP` only
/// when explicitly deployed behind a trusted reverse proxy.
fn client_ip(headers: &HeaderMap, addr: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
            return real_ip.to_string();
        }
    }

    addr.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "192.0.2.7:4242".parse().unwrap()
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let headers = HeaderMap::new();
        assert_eq!(client_ip(&headers, peer(), false), "192.0.2.7");
    }

    #[test]
    fn test_forwarded_header_ignored_without_proxy_flag() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        assert_eq!(client_ip(&headers, peer(), false), "192.0.2.7");
    }

    #[test]
    fn test_first_forwarded_hop_wins_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.5"));
        assert_eq!(client_ip(&headers, peer(), true), "203.0.113.5");
    }
}
