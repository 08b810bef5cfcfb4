//! Handlers for runtime notification settings.

use axum::extract::State;
use axum::Json;
use zerostat_core::error::CoreError;
use zerostat_events::NotificationConfig;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /settings/notifications
pub async fn get_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<NotificationConfig>>> {
    let config = state.dispatcher.notifier().config().await;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /settings/notifications
///
/// Replaces every channel parameter at once; omitted fields are cleared.
/// The new settings apply to the next notification sent and are saved to
/// the data directory.
pub async fn update_notifications(
    State(state): State<AppState>,
    Json(input): Json<NotificationConfig>,
) -> AppResult<Json<DataResponse<NotificationConfig>>> {
    let input = input.normalized();
    if let Some(url) = &input.webhook_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Validation("webhook_url must be an http(s) URL".to_string()).into());
        }
    }

    let applied = state.replace_notification_settings(input).await;
    tracing::info!(
        webhook = applied.webhook_url.is_some(),
        telegram = applied.telegram_target().is_some(),
        email = applied.email_configured(),
        "Notification settings replaced"
    );
    Ok(Json(DataResponse { data: applied }))
}
