//! Handlers for link management endpoints under `/api/urls`.

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
};
use std::net::SocketAddr;
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse, UpdateLinkRequest};
use crate::api::dto::pagination::{PaginatedResponse, PaginationParams};
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /api/urls` - creates a short link.
///
/// Returns 201 with the created mapping, 400 for an invalid URL, 409 when a
/// requested custom code is taken.
pub async fn create_link_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(
            payload.url,
            payload.custom_code,
            payload.expires_at,
            Some(addr.ip().to_string()),
        )
        .await?;

    let response = LinkResponse::from_link(&link, &state.base_url);
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/urls` - paginated listing, newest first.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<LinkResponse>>, AppError> {
    let page = params.page();
    let page_size = params.page_size();

    let (links, total) = state.link_service.list_links(page, page_size).await?;

    let items = links
        .iter()
        .map(|link| LinkResponse::from_link(link, &state.base_url))
        .collect();

    Ok(Json(PaginatedResponse {
        items,
        page,
        page_size,
        total,
    }))
}

/// `GET /api/urls/{id}` - fetches a single mapping.
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;
    Ok(Json(LinkResponse::from_link(&link, &state.base_url)))
}

/// `PATCH /api/urls/{id}` - updates the target URL and/or expiry.
///
/// Absent fields keep their stored value. The redirect cache entry for the
/// code is dropped so the change takes effect immediately.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .update_link(
            id,
            LinkPatch {
                long_url: payload.url,
                expires_at: payload.expires_at,
            },
        )
        .await?;

    invalidate_cached_code(&state, link.code.clone());

    Ok(Json(LinkResponse::from_link(&link, &state.base_url)))
}

/// `DELETE /api/urls/{id}` - deletes a mapping. 204 on success.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let link = state.link_service.get_link(id).await?;
    state.link_service.delete_link(id).await?;

    invalidate_cached_code(&state, link.code);

    Ok(StatusCode::NO_CONTENT)
}

/// Drops the cached redirect for `code` in the background.
fn invalidate_cached_code(state: &AppState, code: String) {
    let cache = state.cache.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.invalidate(&code).await {
            error!("Failed to invalidate cached code {}: {}", code, e);
        }
    });
}
