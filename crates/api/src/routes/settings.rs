//! Route definitions for runtime settings.

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET /notifications   -> get_notifications
/// PUT /notifications   -> update_notifications
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(settings::get_notifications).put(settings::update_notifications),
    )
}
