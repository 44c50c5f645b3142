use crate::domain::alerts::Alert;
use crate::entities::item;
use crate::errors::ServiceError;
use crate::{ApiResponse, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ItemAlerts {
    #[serde(flatten)]
    pub item: item::Model,
    pub alerts: Vec<Alert>,
}

/// Items currently raising at least one alert (stock or expiration), each
/// with its computed alert list. Evaluated against the server clock.
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    responses(
        (status = 200, description = "Alerting items returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn list_alerts(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let alerting = state.items.list_alerting(Utc::now()).await?;

    let payload: Vec<ItemAlerts> = alerting
        .into_iter()
        .map(|(item, alerts)| ItemAlerts { item, alerts })
        .collect();

    Ok(Json(ApiResponse::success(payload)))
}
