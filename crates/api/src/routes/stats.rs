//! Route definitions for host metrics.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats`.
///
/// ```text
/// GET /          -> get_stats
/// GET /history   -> get_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(stats::get_stats))
        .route("/history", get(stats::get_history))
}
