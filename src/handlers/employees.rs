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
        validation::{is_valid_hhmm, parse_id},
    },
    config::AppState,
    db::{EmployeeChanges, EmployeeFilter},
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        employee::{
            Employee, EmployeeKind, EmployeeOverview, EmployeeProfile, ScheduleEntry,
            StaffPosition, Weekday,
        },
    },
    services::employee_service::{AddEmployeeData, SwitchExtra},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListEmployeesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub branch_id: Option<String>,
    // Lista separada por vírgula: "receptionist,manager".
    pub position: Option<String>,
    pub active: Option<bool>,
    pub day: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

// Traduz os query params no filtro de listagem; valores fora do domínio
// são erro do cliente.
fn build_employee_filter(query: &ListEmployeesQuery) -> Result<EmployeeFilter, AppError> {
    let branch_id = query
        .branch_id
        .as_deref()
        .map(|raw| parse_id(raw, "branch ID"))
        .transpose()?;

    let mut positions = Vec::new();
    if let Some(raw) = &query.position {
        for token in raw.split(',') {
            let position = StaffPosition::parse(token)
                .ok_or_else(|| AppError::Validation("Invalid position".to_string()))?;
            if !positions.contains(&position) {
                positions.push(position);
            }
        }
    }

    let day = query
        .day
        .as_deref()
        .map(|raw| {
            Weekday::parse(raw).ok_or_else(|| AppError::Validation("Invalid day".to_string()))
        })
        .transpose()?;

    for time in [&query.start, &query.end].into_iter().flatten() {
        if !is_valid_hhmm(time) {
            return Err(AppError::Validation(
                "Invalid time, expected HH:MM".to_string(),
            ));
        }
    }

    Ok(EmployeeFilter {
        branch_id,
        positions,
        active: query.active,
        day,
        start: query.start.clone(),
        end: query.end.clone(),
    })
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddEmployeePayload {
    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "stylist")]
    pub role: String,

    #[validate(length(min = 1, message = "required"))]
    pub branch_id: String,

    pub schedule: Vec<ScheduleEntry>,
    pub position: Option<StaffPosition>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 1, message = "required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "required"))]
    pub branch_id: String,

    pub schedule: Vec<ScheduleEntry>,
    pub position: Option<StaffPosition>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    pub branch_id: Option<String>,
    pub position: Option<StaffPosition>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchRolePayload {
    #[validate(length(min = 1, message = "required"))]
    pub user_id: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "stylist")]
    pub current_role: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "staff")]
    pub new_role: String,

    pub username: Option<String>,
    pub phone: Option<String>,
    pub branch_id: Option<String>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub position: Option<StaffPosition>,
    pub active: Option<bool>,
}

// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(PageQuery),
    responses(
        (status = 200, description = "Listagem agregada, um registro por usuário", body = Vec<EmployeeOverview>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_employees(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;
    let (page, limit, _) = query.clamp();

    let result = app_state
        .employee_service
        .list_all_employees(page, limit)
        .await?;

    Ok(ApiResponse::ok(
        "Employees retrieved successfully",
        json!({ "employees": result.items, "pagination": result.pagination }),
    ))
}

// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = AddEmployeePayload,
    responses(
        (status = 201, description = "Usuário promovido a funcionário", body = Employee),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Usuário já tem o papel")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_employee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let employee = app_state
        .employee_service
        .add_employee(
            &payload.email,
            AddEmployeeData {
                role: payload.role,
                branch_id: payload.branch_id,
                schedule: payload.schedule,
                position: payload.position,
            },
        )
        .await?;

    Ok(ApiResponse::created("Employee added successfully", employee))
}

// PATCH /api/employees/switch-role
#[utoipa::path(
    patch,
    path = "/api/employees/switch-role",
    tag = "Employees",
    request_body = SwitchRolePayload,
    responses(
        (status = 200, description = "Papel trocado com o registro e o conjunto de roles atualizados juntos"),
        (status = 400, description = "Role desconhecido"),
        (status = 404, description = "Usuário ou registro não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn switch_employee_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<SwitchRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let (updated_user, employee) = app_state
        .employee_service
        .switch_role(
            &payload.user_id,
            &payload.current_role,
            &payload.new_role,
            SwitchExtra {
                username: payload.username,
                phone: payload.phone,
                branch_id: payload.branch_id,
                schedule: payload.schedule,
                position: payload.position,
                active: payload.active,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        format!(
            "Employee switched from {} to {}",
            payload.current_role, payload.new_role
        ),
        json!({ "user": updated_user, "employee": employee }),
    ))
}

// GET /api/employees/{kind}
#[utoipa::path(
    get,
    path = "/api/employees/{kind}",
    tag = "Employees",
    params(
        ("kind" = String, Path, description = "stylist | staff | cashier"),
        ListEmployeesQuery
    ),
    responses(
        (status = 200, description = "Listagem filtrada do papel", body = Vec<EmployeeProfile>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_employees_by_kind(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(kind): Path<String>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Staff, Role::Admin])?;

    let filter = build_employee_filter(&query)?;
    let (page, limit, _) = PageQuery {
        page: query.page,
        limit: query.limit,
    }
    .clamp();

    let result = app_state
        .employee_service
        .list_employees(&kind, &filter, page, limit)
        .await?;

    Ok(ApiResponse::ok(
        "Employees retrieved successfully",
        json!({ "employees": result.items, "pagination": result.pagination }),
    ))
}

// POST /api/employees/{kind}
#[utoipa::path(
    post,
    path = "/api/employees/{kind}",
    tag = "Employees",
    params(("kind" = String, Path, description = "stylist | staff | cashier")),
    request_body = CreateEmployeePayload,
    responses(
        (status = 201, description = "Registro criado", body = Employee),
        (status = 409, description = "Usuário já tem o papel")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(kind): Path<String>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let employee = app_state
        .employee_service
        .create_employee(
            &kind,
            &payload.user_id,
            &payload.branch_id,
            payload.schedule,
            payload.position,
        )
        .await?;

    Ok(ApiResponse::created(
        format!("{} created", employee.kind.title()),
        employee,
    ))
}

// GET /api/employees/{kind}/{userId}
#[utoipa::path(
    get,
    path = "/api/employees/{kind}/{userId}",
    tag = "Employees",
    params(
        ("kind" = String, Path, description = "stylist | staff | cashier"),
        ("userId" = String, Path, description = "User id do funcionário")
    ),
    responses(
        (status = 200, description = "Registro com usuário e filial juntados", body = EmployeeProfile),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path((kind, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let profile = app_state
        .employee_service
        .get_employee_by_user_id(&kind, &user_id)
        .await?
        .ok_or_else(|| match EmployeeKind::parse(&kind) {
            Some(k) => AppError::NotFound(k.title()),
            None => AppError::NotFound("Employee"),
        })?;

    Ok(ApiResponse::ok("Success", profile))
}

// PATCH /api/employees/{kind}/{userId}
#[utoipa::path(
    patch,
    path = "/api/employees/{kind}/{userId}",
    tag = "Employees",
    params(
        ("kind" = String, Path, description = "stylist | staff | cashier"),
        ("userId" = String, Path, description = "User id do funcionário")
    ),
    request_body = UpdateEmployeePayload,
    responses(
        (status = 200, description = "Registro atualizado", body = Employee),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((kind, user_id)): Path<(String, String)>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;
    payload.validate()?;

    let branch_id = payload
        .branch_id
        .as_deref()
        .map(|raw| parse_id(raw, "branch ID"))
        .transpose()?;

    let employee = app_state
        .employee_service
        .update_employee(
            &kind,
            &user_id,
            EmployeeChanges {
                branch_id,
                position: payload.position,
                schedule: payload.schedule,
                active: payload.active,
            },
        )
        .await?;

    Ok(ApiResponse::ok(
        format!("{} updated", employee.kind.title()),
        employee,
    ))
}

// DELETE /api/employees/{kind}/{userId}
#[utoipa::path(
    delete,
    path = "/api/employees/{kind}/{userId}",
    tag = "Employees",
    params(
        ("kind" = String, Path, description = "stylist | staff | cashier"),
        ("userId" = String, Path, description = "User id do funcionário")
    ),
    responses(
        (status = 200, description = "Registro removido e role retirado do usuário"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_employee(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((kind, user_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    user.require_any(&[Role::Admin])?;

    app_state
        .employee_service
        .remove_employee(&user_id, &kind)
        .await?;

    Ok(ApiResponse::message(format!(
        "Employee with role {kind} removed successfully"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> ListEmployeesQuery {
        ListEmployeesQuery {
            page: None,
            limit: None,
            branch_id: None,
            position: None,
            active: None,
            day: None,
            start: None,
            end: None,
        }
    }

    #[test]
    fn filter_parses_comma_separated_positions() {
        let query = ListEmployeesQuery {
            position: Some("receptionist,manager".to_string()),
            ..empty_query()
        };
        let filter = build_employee_filter(&query).unwrap();
        assert_eq!(
            filter.positions,
            vec![StaffPosition::Receptionist, StaffPosition::Manager]
        );
    }

    #[test]
    fn filter_rejects_unknown_position_and_day() {
        let query = ListEmployeesQuery {
            position: Some("janitor".to_string()),
            ..empty_query()
        };
        assert!(build_employee_filter(&query).is_err());

        let query = ListEmployeesQuery {
            day: Some("someday".to_string()),
            ..empty_query()
        };
        assert!(build_employee_filter(&query).is_err());
    }

    #[test]
    fn filter_rejects_malformed_window_times() {
        let query = ListEmployeesQuery {
            start: Some("9h".to_string()),
            ..empty_query()
        };
        assert!(build_employee_filter(&query).is_err());
    }

    #[test]
    fn filter_passes_through_schedule_window() {
        let query = ListEmployeesQuery {
            day: Some("monday".to_string()),
            start: Some("09:00".to_string()),
            end: Some("11:00".to_string()),
            active: Some(true),
            ..empty_query()
        };
        let filter = build_employee_filter(&query).unwrap();
        assert_eq!(filter.day, Some(Weekday::Monday));
        assert_eq!(filter.start.as_deref(), Some("09:00"));
        assert_eq!(filter.end.as_deref(), Some("11:00"));
        assert_eq!(filter.active, Some(true));
    }
}
