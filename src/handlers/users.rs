use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::UserProfile,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 2, message = "username must have at least 2 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "invalid_phone"))]
    pub phone: Option<String>,
}

// PATCH /api/users/me
#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = UserProfile),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let profile = app_state
        .user_service
        .update_user(
            user.0.id,
            payload.username.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;

    Ok(ApiResponse::ok("User updated successfully", profile))
}
