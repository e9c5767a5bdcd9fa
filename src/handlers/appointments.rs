use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::PageQuery,
        response::ApiResponse,
        validation::validate_time_hhmm,
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        appointment::{Appointment, AppointmentDetails},
        auth::Role,
    },
    services::appointment_service::BookingRequest,
};

// O campo serviceId aceita as duas formas históricas do schema: um id
// único ou uma lista de ids (agendamento multi-serviço).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(id) => vec![id],
            OneOrMany::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentPayload {
    // User id do profissional preferido; ausente = "qualquer profissional".
    pub stylist_id: Option<String>,

    pub service_id: OneOrMany,

    #[validate(length(min = 1, message = "required"))]
    pub branch_id: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "2024-06-01")]
    pub date: String,

    #[validate(custom(function = validate_time_hhmm))]
    #[schema(example = "10:00")]
    pub time: String,

    pub note: Option<String>,
}

impl CreateAppointmentPayload {
    fn into_request(self) -> BookingRequest {
        BookingRequest {
            stylist_user_id: self.stylist_id,
            service_ids: self.service_id.into_vec(),
            branch_id: self.branch_id,
            date: self.date,
            time: self.time,
            note: self.note,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForceCreateAppointmentPayload {
    // No caminho administrativo o cliente é resolvido por e-mail.
    #[validate(email(message = "invalid_email"))]
    pub customer_email: String,

    pub stylist_id: Option<String>,
    pub service_id: OneOrMany,

    #[validate(length(min = 1, message = "required"))]
    pub branch_id: String,

    #[validate(length(min = 1, message = "required"))]
    pub date: String,

    #[validate(custom(function = validate_time_hhmm))]
    pub time: String,

    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "confirmed")]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicesPayload {
    pub service_id: OneOrMany,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MyAppointmentsQuery {
    // "all" (padrão) desliga o filtro de status.
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// POST /api/appointments
#[utoipa::path(
    post,
    path = "/api/appointments",
    tag = "Appointments",
    request_body = CreateAppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado", body = Appointment),
        (status = 403, description = "Cliente já tem agendamento ativo"),
        (status = 409, description = "Conflito de horário")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAppointmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::User])?;
    payload.validate()?;

    let appointment = app_state
        .appointment_service
        .create(user.0.id, payload.into_request())
        .await?;

    Ok(ApiResponse::created(
        "Appointment created successfully",
        appointment,
    ))
}

// POST /api/appointments/force
#[utoipa::path(
    post,
    path = "/api/appointments/force",
    tag = "Appointments",
    request_body = ForceCreateAppointmentPayload,
    responses(
        (status = 201, description = "Agendamento criado sem checagens de disponibilidade", body = Appointment),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn force_create_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ForceCreateAppointmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;
    payload.validate()?;

    let request = BookingRequest {
        stylist_user_id: payload.stylist_id,
        service_ids: payload.service_id.into_vec(),
        branch_id: payload.branch_id,
        date: payload.date,
        time: payload.time,
        note: payload.note,
    };

    let appointment = app_state
        .appointment_service
        .force_create(&payload.customer_email, request)
        .await?;

    Ok(ApiResponse::created(
        "Appointment created successfully",
        appointment,
    ))
}

// GET /api/appointments/me
#[utoipa::path(
    get,
    path = "/api/appointments/me",
    tag = "Appointments",
    params(MyAppointmentsQuery),
    responses(
        (status = 200, description = "Agendamentos do usuário", body = Vec<AppointmentDetails>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_appointments(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MyAppointmentsQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::User])?;
    let (page, limit, _) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .clamp();

    let result = app_state
        .appointment_service
        .get_by_user(user.0.id, query.status.as_deref(), page, limit)
        .await?;

    Ok(ApiResponse::ok(
        "Appointments retrieved successfully",
        json!({ "appointments": result.items, "pagination": result.pagination }),
    ))
}

// GET /api/appointments/{appointmentId}
#[utoipa::path(
    get,
    path = "/api/appointments/{appointmentId}",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento", body = AppointmentDetails),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;

    let details = app_state
        .appointment_service
        .get_by_id(&appointment_id)
        .await?;

    Ok(ApiResponse::ok("Appointment retrieved successfully", details))
}

// PATCH /api/appointments/{appointmentId}/cancel
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointmentId}/cancel",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento cancelado", body = Appointment),
        (status = 400, description = "Status terminal"),
        (status = 403, description = "Não é o dono")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::User, Role::Admin])?;

    let appointment = app_state
        .appointment_service
        .cancel(&user.0, &appointment_id)
        .await?;

    Ok(ApiResponse::ok(
        "Appointment canceled successfully",
        appointment,
    ))
}

// PATCH /api/appointments/{appointmentId}/approve
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointmentId}/approve",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento confirmado", body = Appointment),
        (status = 400, description = "Só pending pode ser aprovado"),
        (status = 403, description = "Ator não é staff")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;

    let appointment = app_state
        .appointment_service
        .approve(user.0.id, &appointment_id)
        .await?;

    Ok(ApiResponse::ok(
        "Appointment approved successfully",
        appointment,
    ))
}

// PATCH /api/appointments/{appointmentId}/complete
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointmentId}/complete",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Atendimento concluído", body = Appointment),
        (status = 400, description = "Só confirmed pode ser concluído"),
        (status = 403, description = "Profissional errado")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Stylist, Role::Admin])?;

    let appointment = app_state
        .appointment_service
        .complete(user.0.id, &appointment_id)
        .await?;

    Ok(ApiResponse::ok(
        "Appointment marked as completed",
        appointment,
    ))
}

// PATCH /api/appointments/{appointmentId}/status
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointmentId}/status",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status alterado sem guarda de transição", body = Appointment),
        (status = 400, description = "Status fora do enum")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_appointment_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<ChangeStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let appointment = app_state
        .appointment_service
        .change_status(&appointment_id, &payload.status)
        .await?;

    Ok(ApiResponse::ok(
        format!("Appointment status changed to {}", payload.status),
        appointment,
    ))
}

// PATCH /api/appointments/{appointmentId}/services
#[utoipa::path(
    patch,
    path = "/api/appointments/{appointmentId}/services",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    request_body = UpdateServicesPayload,
    responses(
        (status = 200, description = "Serviços reatribuídos", body = Appointment),
        (status = 403, description = "Ator não é o profissional atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment_services(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
    Json(payload): Json<UpdateServicesPayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Stylist])?;

    let appointment = app_state
        .appointment_service
        .update_services(user.0.id, &appointment_id, &payload.service_id.into_vec())
        .await?;

    Ok(ApiResponse::ok(
        "Appointment services updated successfully",
        appointment,
    ))
}

// DELETE /api/appointments/{appointmentId}
#[utoipa::path(
    delete,
    path = "/api/appointments/{appointmentId}",
    tag = "Appointments",
    params(("appointmentId" = String, Path, description = "ID do agendamento")),
    responses(
        (status = 200, description = "Agendamento e avaliações associadas apagados", body = Appointment),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_appointment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(appointment_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;

    let appointment = app_state
        .appointment_service
        .delete(&appointment_id)
        .await?;

    Ok(ApiResponse::ok(
        "Appointment deleted successfully",
        appointment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_id_accepts_single_and_array_forms() {
        let single: CreateAppointmentPayload = serde_json::from_value(serde_json::json!({
            "serviceId": "550e8400-e29b-41d4-a716-446655440000",
            "branchId": "b",
            "date": "2024-06-01",
            "time": "10:00"
        }))
        .unwrap();
        assert_eq!(single.service_id.clone().into_vec().len(), 1);

        let many: CreateAppointmentPayload = serde_json::from_value(serde_json::json!({
            "serviceId": ["a", "b"],
            "branchId": "b",
            "date": "2024-06-01",
            "time": "10:00"
        }))
        .unwrap();
        assert_eq!(many.service_id.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn create_payload_rejects_malformed_time() {
        let payload: CreateAppointmentPayload = serde_json::from_value(serde_json::json!({
            "serviceId": "x",
            "branchId": "b",
            "date": "2024-06-01",
            "time": "25:00"
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
