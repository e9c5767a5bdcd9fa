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
    models::{
        auth::Role,
        transaction::{PaymentMethod, Transaction},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    #[validate(length(min = 1, message = "required"))]
    pub appointment_id: String,

    // User id do caixa que registra o pagamento.
    #[validate(length(min = 1, message = "required"))]
    pub cashier_id: String,

    pub payment_method: PaymentMethod,
    pub note: Option<String>,
}

// POST /api/transactions
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    request_body = CreateTransactionPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = Transaction),
        (status = 400, description = "Agendamento não concluído"),
        (status = 409, description = "Agendamento já pago")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Cashier, Role::Admin])?;
    payload.validate()?;

    let transaction = app_state
        .transaction_service
        .create_transaction(
            &payload.appointment_id,
            &payload.cashier_id,
            payload.payment_method,
            payload.note,
        )
        .await?;

    Ok(ApiResponse::created(
        "Transaction created successfully",
        transaction,
    ))
}

// GET /api/transactions
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    params(PageQuery),
    responses((status = 200, description = "Transações", body = Vec<Transaction>)),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Cashier, Role::Admin])?;
    let (page, limit, _) = query.clamp();

    let result = app_state
        .transaction_service
        .list_transactions(page, limit)
        .await?;

    Ok(ApiResponse::ok(
        "Transactions fetched successfully",
        json!({ "transactions": result.items, "pagination": result.pagination }),
    ))
}

// GET /api/transactions/{transactionId}
#[utoipa::path(
    get,
    path = "/api/transactions/{transactionId}",
    tag = "Transactions",
    params(("transactionId" = String, Path, description = "ID da transação")),
    responses(
        (status = 200, description = "Transação", body = Transaction),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Cashier, Role::Admin])?;

    let transaction = app_state
        .transaction_service
        .get_transaction(&transaction_id)
        .await?;

    Ok(ApiResponse::ok(
        "Transaction fetched successfully",
        transaction,
    ))
}

// PATCH /api/transactions/{transactionId}/confirm
#[utoipa::path(
    patch,
    path = "/api/transactions/{transactionId}/confirm",
    tag = "Transactions",
    params(("transactionId" = String, Path, description = "ID da transação")),
    responses(
        (status = 200, description = "Pagamento confirmado", body = Transaction),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Cashier, Role::Admin])?;

    let transaction = app_state
        .transaction_service
        .confirm_transaction(&transaction_id)
        .await?;

    Ok(ApiResponse::ok(
        "Transaction confirmed successfully",
        transaction,
    ))
}
