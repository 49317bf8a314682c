//! API route configuration.
//!
//! # Endpoints
//!
//! - `POST   /urls`       - Create a shortened URL
//! - `GET    /urls`       - List mappings (paginated)
//! - `GET    /urls/{id}`  - Fetch one mapping
//! - `PATCH  /urls/{id}`  - Update target URL and/or expiry
//! - `DELETE /urls/{id}`  - Delete a mapping

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_link_handler).get(list_links_handler))
        .route(
            "/urls/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
}
