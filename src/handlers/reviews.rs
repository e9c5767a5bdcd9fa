use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::PageQuery, response::ApiResponse},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{auth::Role, review::{Review, ReviewDetails}},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewPayload {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i16,
    pub comment: Option<String>,
}

// POST /api/reviews/{appointmentId}
#[utoipa::path(
    post,
    path = "/api/reviews/{appointmentId}",
    tag = "Reviews",
    params(("appointmentId" = String, Path, description = "Agendamento avaliado")),
    request_body = SubmitReviewPayload,
    responses(
        (status = 201, description = "Avaliação registrada", body = Review),
        (status = 400, description = "Agendamento não concluído ou nota fora de [1,5]"),
        (status = 403, description = "Não é o cliente do agendamento"),
        (status = 409, description = "Avaliação já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_review(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<SubmitReviewPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::User])?;
    payload.validate()?;

    let review = app_state
        .review_service
        .submit_review(
            user.0.id,
            &appointment_id,
            payload.rating,
            payload.comment.as_deref(),
        )
        .await?;

    Ok(ApiResponse::created("Review submitted successfully", review))
}

// GET /api/reviews/recent
#[utoipa::path(
    get,
    path = "/api/reviews/recent",
    tag = "Reviews",
    params(PageQuery),
    responses(
        (status = 200, description = "Avaliações mais recentes", body = Vec<ReviewDetails>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_recent_reviews(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;
    let (page, limit, _) = query.clamp();

    let result = app_state.review_service.get_recent_reviews(page, limit).await?;

    Ok(ApiResponse::ok(
        "Reviews retrieved successfully",
        json!({ "reviews": result.items, "pagination": result.pagination }),
    ))
}

// GET /api/reviews/{target}/{id}
#[utoipa::path(
    get,
    path = "/api/reviews/{target}/{id}",
    tag = "Reviews",
    params(
        ("target" = String, Path, description = "appointment | customer"),
        ("id" = String, Path, description = "ID do alvo"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Avaliações do alvo", body = Vec<ReviewDetails>),
        (status = 400, description = "Alvo desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_reviews_by(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((target, id)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    let (page, limit, _) = query.clamp();

    let result = app_state
        .review_service
        .get_reviews_by(&target, &id, page, limit)
        .await?;

    Ok(ApiResponse::ok(
        "Reviews retrieved successfully",
        json!({ "reviews": result.items, "pagination": result.pagination }),
    ))
}

// DELETE /api/reviews/{reviewId}
#[utoipa::path(
    delete,
    path = "/api/reviews/{reviewId}",
    tag = "Reviews",
    params(("reviewId" = String, Path, description = "ID da avaliação")),
    responses(
        (status = 200, description = "Avaliação apagada"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_review(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(review_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;

    app_state.review_service.delete_review(&review_id).await?;

    Ok(ApiResponse::message("Review deleted successfully"))
}
