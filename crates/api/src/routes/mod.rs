pub mod health;
pub mod notifications;
pub mod rules;
pub mod settings;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /stats                      fresh metric snapshot (GET)
/// /stats/history              retained snapshots + chart points (GET)
///
/// /rules                      list, create (GET, POST)
/// /rules/{id}/toggle          flip active (POST)
/// /rules/{id}                 delete (DELETE)
///
/// /notifications/test         send a test message (POST)
///
/// /settings/notifications     channel parameters (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/stats", stats::router())
        .nest("/rules", rules::router())
        .nest("/notifications", notifications::router())
        .nest("/settings", settings::router())
}
