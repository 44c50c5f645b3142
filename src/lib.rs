//! Almoxarifado API Library
//!
//! Core functionality for the maintenance-material stock control service:
//! the item/movement data model, the movement processor, and the stock and
//! expiration alert engine.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub items: services::items::ItemService,
    pub movements: services::movements::MovementService,
}

impl AppState {
    /// Wires up services over an established pool. The HTTP layer and the
    /// integration tests share this constructor.
    pub fn build(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        event_sender: events::EventSender,
    ) -> Self {
        let items = services::items::ItemService::new(db.clone(), event_sender.clone());
        let movements = services::movements::MovementService::new(db.clone(), event_sender.clone());

        Self {
            db,
            config,
            event_sender,
            items,
            movements,
        }
    }
}

/// Common response wrapper.
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, errors::ServiceError>;

/// Versioned API routes.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::health::api_status))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/:id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route(
            "/items/:id/movements",
            get(handlers::movements::list_item_movements)
                .post(handlers::movements::create_movement),
        )
        .route("/movements", get(handlers::movements::list_movements))
        .route(
            "/movements/search",
            get(handlers::movements::search_movements),
        )
        .route("/alerts", get(handlers::alerts::list_alerts))
}
