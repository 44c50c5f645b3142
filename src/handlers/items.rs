use crate::errors::ServiceError;
use crate::services::items::{ItemUpdate, NewItem};
use crate::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1))]
    pub setor: String,
    #[validate(length(min = 1))]
    pub codigo_gce: String,
    #[validate(length(min = 1))]
    pub item_nome: String,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub estoque_minimo: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub estoque_atual: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub patrimonio_atual: i32,
    pub valor_referencia: Option<f64>,
    pub ata: Option<String>,
    pub numero_pedido: Option<String>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub observacoes: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    pub setor: Option<String>,
    pub codigo_gce: Option<String>,
    pub item_nome: Option<String>,
    #[validate(range(min = 0))]
    pub estoque_minimo: Option<i32>,
    pub valor_referencia: Option<f64>,
    pub ata: Option<String>,
    pub numero_pedido: Option<String>,
    pub validade_valor_referencia: Option<DateTime<Utc>>,
    pub validade_ata: Option<DateTime<Utc>>,
    pub observacoes: Option<String>,
    pub ativo: Option<bool>,
}

impl From<CreateItemRequest> for NewItem {
    fn from(req: CreateItemRequest) -> Self {
        NewItem {
            setor: req.setor,
            codigo_gce: req.codigo_gce,
            item_nome: req.item_nome,
            estoque_minimo: req.estoque_minimo,
            estoque_atual: req.estoque_atual,
            patrimonio_atual: req.patrimonio_atual,
            valor_referencia: req.valor_referencia,
            ata: req.ata,
            numero_pedido: req.numero_pedido,
            validade_valor_referencia: req.validade_valor_referencia,
            validade_ata: req.validade_ata,
            observacoes: req.observacoes,
            ativo: req.ativo,
        }
    }
}

impl From<UpdateItemRequest> for ItemUpdate {
    fn from(req: UpdateItemRequest) -> Self {
        ItemUpdate {
            setor: req.setor,
            codigo_gce: req.codigo_gce,
            item_nome: req.item_nome,
            estoque_minimo: req.estoque_minimo,
            valor_referencia: req.valor_referencia,
            ata: req.ata,
            numero_pedido: req.numero_pedido,
            validade_valor_referencia: req.validade_valor_referencia,
            validade_ata: req.validade_ata,
            observacoes: req.observacoes,
            ativo: req.ativo,
        }
    }
}

/// List all items, ordered by sector and catalog code.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Item list returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn list_items(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let items = state.items.list().await?;
    Ok(Json(ApiResponse::success(items)))
}

/// Create a new item.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate code or name", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state.items.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// Fetch a single item.
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.items.get(id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Edit an item's administrative fields. Balances cannot be changed here.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate code or name", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    payload.validate()?;
    let item = state.items.update(id, payload.into()).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Remove an item together with its movement history.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.items.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
