use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        branch::{Branch, BranchDetails},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchPayload {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "required"))]
    pub address: String,
    #[validate(length(min = 1, message = "required"))]
    pub phone: String,
    pub manager_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBranchPayload {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager_id: Option<String>,
}

// POST /api/branches
#[utoipa::path(
    post,
    path = "/api/branches",
    tag = "Branches",
    request_body = CreateBranchPayload,
    responses((status = 201, description = "Filial criada", body = BranchDetails)),
    security(("api_jwt" = []))
)]
pub async fn create_branch(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateBranchPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let branch = app_state
        .branch_service
        .create_branch(
            &payload.name,
            &payload.address,
            &payload.phone,
            payload.manager_id.as_deref(),
        )
        .await?;

    Ok(ApiResponse::created("Branch created successfully", branch))
}

// GET /api/branches
#[utoipa::path(
    get,
    path = "/api/branches",
    tag = "Branches",
    responses((status = 200, description = "Todas as filiais", body = Vec<BranchDetails>)),
    security(("api_jwt" = []))
)]
pub async fn get_all_branches(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let branches = app_state.branch_service.get_all_branches().await?;
    Ok(ApiResponse::ok("Branches fetched successfully", branches))
}

// GET /api/branches/{branchId}
#[utoipa::path(
    get,
    path = "/api/branches/{branchId}",
    tag = "Branches",
    params(("branchId" = String, Path, description = "ID da filial")),
    responses(
        (status = 200, description = "Filial", body = BranchDetails),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_branch(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let branch = app_state.branch_service.get_branch_by_id(&branch_id).await?;
    Ok(ApiResponse::ok("Branch fetched successfully", branch))
}

// PATCH /api/branches/{branchId}
#[utoipa::path(
    patch,
    path = "/api/branches/{branchId}",
    tag = "Branches",
    params(("branchId" = String, Path, description = "ID da filial")),
    request_body = UpdateBranchPayload,
    responses(
        (status = 200, description = "Filial atualizada", body = Branch),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_branch(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(branch_id): Path<String>,
    Json(payload): Json<UpdateBranchPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let branch = app_state
        .branch_service
        .update_branch(
            &branch_id,
            payload.name.as_deref(),
            payload.address.as_deref(),
            payload.phone.as_deref(),
            payload.manager_id.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok("Branch updated successfully", branch))
}

// DELETE /api/branches/{branchId}
#[utoipa::path(
    delete,
    path = "/api/branches/{branchId}",
    tag = "Branches",
    params(("branchId" = String, Path, description = "ID da filial")),
    responses(
        (status = 200, description = "Filial apagada"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_branch(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    app_state.branch_service.delete_branch(&branch_id).await?;
    Ok(ApiResponse::message("Branch deleted successfully"))
}
