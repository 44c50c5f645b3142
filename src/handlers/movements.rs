use crate::errors::ServiceError;
use crate::services::movements::{MovementFilters, NewMovement};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_RECENT_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMovementRequest {
    /// One of the six movement type discriminants, e.g. `RETIRADA_MANUTENCAO`
    pub tipo: String,
    /// Magnitude of the movement; sign is ignored, direction comes from `tipo`
    pub quantidade: i32,
    pub numero_chamado: Option<String>,
    pub setor: Option<String>,
    pub responsavel: Option<String>,
    pub ata: Option<String>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub usuario_ad: Option<String>,
    pub observacoes: Option<String>,
    /// Event timestamp; omitted means commit time. May be backdated for
    /// historical corrections.
    pub data_movimento: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RecentMovementsQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MovementSearchQuery {
    pub item_id: Option<Uuid>,
    pub tipo: Option<String>,
    pub setor: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
}

/// Movement ledger of one item, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}/movements",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Movement list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn list_item_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = state.movements.list_for_item(id).await?;
    Ok(Json(ApiResponse::success(movements)))
}

/// Submit a movement against an item. The balance update, status refresh
/// and ledger insert commit atomically; any precondition violation leaves
/// the item untouched.
#[utoipa::path(
    post,
    path = "/api/v1/items/{id}/movements",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = CreateMovementRequest,
    responses(
        (status = 201, description = "Movement committed"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateMovementRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = NewMovement {
        item_id: id,
        tipo: payload.tipo,
        quantidade: payload.quantidade,
        numero_chamado: payload.numero_chamado,
        setor: payload.setor,
        responsavel: payload.responsavel,
        ata: payload.ata,
        validade_ata: payload.validade_ata,
        validade_valor_referencia: payload.validade_valor_referencia,
        usuario_ad: payload.usuario_ad,
        observacoes: payload.observacoes,
        data_movimento: payload.data_movimento,
    };

    let movement = state.movements.submit(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(movement))))
}

/// Most recent movements across all items.
#[utoipa::path(
    get,
    path = "/api/v1/movements",
    params(RecentMovementsQuery),
    responses(
        (status = 200, description = "Movement list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<RecentMovementsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let movements = state
        .movements
        .recent(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .await?;
    Ok(Json(ApiResponse::success(movements)))
}

/// Filtered movement search for reports.
#[utoipa::path(
    get,
    path = "/api/v1/movements/search",
    params(MovementSearchQuery),
    responses(
        (status = 200, description = "Matching movements returned"),
        (status = 400, description = "Invalid filter", body = crate::errors::ErrorResponse)
    ),
    tag = "movements"
)]
pub async fn search_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementSearchQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let filters = MovementFilters {
        item_id: query.item_id,
        tipo: query.tipo,
        setor: query.setor,
        start_date: query.start_date,
        end_date: query.end_date,
        limit: query.limit,
    };

    let movements = state.movements.search(filters).await?;
    Ok(Json(ApiResponse::success(movements)))
}
