//! Route definitions for alert rule management.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::rules;
use crate::state::AppState;

/// Routes mounted at `/rules`.
///
/// ```text
/// GET    /              -> list_rules
/// POST   /              -> create_rule
/// POST   /{id}/toggle   -> toggle_rule
/// DELETE /{id}          -> delete_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rules::list_rules).post(rules::create_rule))
        .route("/{id}/toggle", post(rules::toggle_rule))
        .route("/{id}", delete(rules::delete_rule))
}
