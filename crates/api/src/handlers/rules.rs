//! Handlers for alert rule management.
//!
//! Every mutation is followed by a best-effort save of the rule file.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use zerostat_core::alert::{AlertRule, Comparison, MetricKind, NotificationChannel, RuleDefinition};
use zerostat_core::error::CoreError;
use zerostat_core::types::RuleId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Entity name used in not-found errors.
const RULE_ENTITY: &str = "AlertRule";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for creating a rule.
///
/// Missing numeric fields default to zero; missing text fields to empty.
#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub metric: String,
    pub operator: String,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub duration_secs: u64,
    #[serde(default)]
    pub cooldown_secs: u64,
    #[serde(default)]
    pub message_template: String,
    #[serde(default)]
    pub shell_command: Option<String>,
    #[serde(default)]
    pub channel: String,
}

impl TryFrom<CreateRuleRequest> for RuleDefinition {
    type Error = CoreError;

    fn try_from(req: CreateRuleRequest) -> Result<Self, Self::Error> {
        if req.operator.trim().is_empty() {
            return Err(CoreError::Validation("operator is required".to_string()));
        }

        Ok(RuleDefinition {
            metric: MetricKind::try_from(req.metric)?,
            operator: Comparison::from(req.operator.trim().to_string()),
            threshold: req.threshold,
            duration_secs: req.duration_secs,
            cooldown_secs: req.cooldown_secs,
            message_template: req.message_template.trim().to_string(),
            shell_command: req
                .shell_command
                .map(|cmd| cmd.trim().to_string())
                .filter(|cmd| !cmd.is_empty()),
            channel: NotificationChannel::try_from(req.channel.trim().to_string())?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedRule {
    pub id: RuleId,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /rules
pub async fn list_rules(State(state): State<AppState>) -> Json<DataResponse<Vec<AlertRule>>> {
    Json(DataResponse {
        data: state.rules.list_rules().await,
    })
}

/// POST /rules
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateRuleRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AlertRule>>)> {
    let definition = RuleDefinition::try_from(input)?;
    let rule = state.rules.add_rule(definition).await;
    tracing::info!(rule_id = %rule.id, metric = %rule.definition.metric, "Alert rule created");

    state.persist_rules().await;
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// POST /rules/{id}/toggle
pub async fn toggle_rule(
    State(state): State<AppState>,
    Path(id): Path<RuleId>,
) -> AppResult<Json<DataResponse<AlertRule>>> {
    let rule = state
        .rules
        .toggle_rule(&id)
        .await
        .ok_or_else(|| not_found(&id))?;
    tracing::info!(rule_id = %rule.id, active = rule.active, "Alert rule toggled");

    state.persist_rules().await;
    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /rules/{id}
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<RuleId>,
) -> AppResult<Json<DataResponse<DeletedRule>>> {
    if !state.rules.delete_rule(&id).await {
        return Err(not_found(&id));
    }
    tracing::info!(rule_id = %id, "Alert rule deleted");

    state.persist_rules().await;
    Ok(Json(DataResponse {
        data: DeletedRule { id },
    }))
}

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: RULE_ENTITY,
        id: id.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
