use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{auth::Role, service::Service},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    #[schema(example = "Corte masculino")]
    pub name: String,

    pub description: Option<String>,

    #[schema(value_type = f64, example = 45.0)]
    pub price: Decimal,

    #[schema(example = 30)]
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub duration_minutes: Option<i32>,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListServicesQuery {
    // true = esconde serviços fora de circulação.
    pub available: Option<bool>,
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    request_body = CreateServicePayload,
    responses((status = 201, description = "Serviço criado", body = Service)),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let service = app_state
        .catalog_service
        .create_service(
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.duration_minutes,
        )
        .await?;

    Ok(ApiResponse::created("Service created successfully", service))
}

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    params(ListServicesQuery),
    responses((status = 200, description = "Catálogo de serviços", body = Vec<Service>)),
    security(("api_jwt" = []))
)]
pub async fn get_all_services(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ListServicesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let services = app_state
        .catalog_service
        .get_all_services(query.available.unwrap_or(false))
        .await?;
    Ok(ApiResponse::ok("Services fetched successfully", services))
}

// GET /api/services/{serviceId}
#[utoipa::path(
    get,
    path = "/api/services/{serviceId}",
    tag = "Services",
    params(("serviceId" = String, Path, description = "ID do serviço")),
    responses(
        (status = 200, description = "Serviço", body = Service),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let service = app_state.catalog_service.get_service_by_id(&service_id).await?;
    Ok(ApiResponse::ok("Service fetched successfully", service))
}

// PATCH /api/services/{serviceId}
#[utoipa::path(
    patch,
    path = "/api/services/{serviceId}",
    tag = "Services",
    params(("serviceId" = String, Path, description = "ID do serviço")),
    request_body = UpdateServicePayload,
    responses(
        (status = 200, description = "Serviço atualizado", body = Service),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(service_id): Path<String>,
    Json(payload): Json<UpdateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let service = app_state
        .catalog_service
        .update_service(
            &service_id,
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.price,
            payload.duration_minutes,
            payload.available,
        )
        .await?;

    Ok(ApiResponse::ok("Service updated successfully", service))
}

// DELETE /api/services/{serviceId}
#[utoipa::path(
    delete,
    path = "/api/services/{serviceId}",
    tag = "Services",
    params(("serviceId" = String, Path, description = "ID do serviço")),
    responses(
        (status = 200, description = "Serviço apagado"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    app_state.catalog_service.delete_service(&service_id).await?;
    Ok(ApiResponse::message("Service deleted successfully"))
}
