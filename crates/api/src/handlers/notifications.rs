//! Handler for manual test notifications.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use zerostat_core::alert::NotificationChannel;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /notifications/test`.
#[derive(Debug, Deserialize)]
pub struct TestNotificationRequest {
    pub channel: String,
}

#[derive(Debug, Serialize)]
pub struct TestNotificationResult {
    pub channel: NotificationChannel,
    pub sent: bool,
}

/// POST /notifications/test
///
/// Sends the fixed test message and waits for the transport's answer.
pub async fn send_test(
    State(state): State<AppState>,
    Json(input): Json<TestNotificationRequest>,
) -> AppResult<Json<DataResponse<TestNotificationResult>>> {
    let channel = NotificationChannel::try_from(input.channel.trim().to_string())?;
    if channel == NotificationChannel::None {
        return Err(AppError::BadRequest("channel is required".to_string()));
    }

    state.dispatcher.send_test(channel).await?;

    Ok(Json(DataResponse {
        data: TestNotificationResult {
            channel,
            sent: true,
        },
    }))
}
