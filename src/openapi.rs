use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::items::list_items,
        crate::handlers::items::create_item,
        crate::handlers::items::get_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,
        crate::handlers::movements::list_item_movements,
        crate::handlers::movements::create_movement,
        crate::handlers::movements::list_movements,
        crate::handlers::movements::search_movements,
        crate::handlers::alerts::list_alerts,
    ),
    components(schemas(
        crate::handlers::items::CreateItemRequest,
        crate::handlers::items::UpdateItemRequest,
        crate::handlers::movements::CreateMovementRequest,
        crate::domain::alerts::Alert,
        crate::domain::alerts::AlertKind,
        crate::domain::alerts::Severity,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "items", description = "Inventory line management"),
        (name = "movements", description = "Movement ledger and processor"),
        (name = "alerts", description = "Stock and expiration alerts")
    ),
    info(
        title = "Almoxarifado API",
        description = "Maintenance-material stock control: coupled balances, immutable movement ledger, alerting"
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the document at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
