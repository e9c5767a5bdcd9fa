use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::update_me,

        // --- Appointments ---
        handlers::appointments::create_appointment,
        handlers::appointments::force_create_appointment,
        handlers::appointments::get_my_appointments,
        handlers::appointments::get_appointment,
        handlers::appointments::cancel_appointment,
        handlers::appointments::approve_appointment,
        handlers::appointments::complete_appointment,
        handlers::appointments::change_appointment_status,
        handlers::appointments::update_appointment_services,
        handlers::appointments::delete_appointment,

        // --- Reviews ---
        handlers::reviews::submit_review,
        handlers::reviews::get_recent_reviews,
        handlers::reviews::get_reviews_by,
        handlers::reviews::delete_review,

        // --- Employees ---
        handlers::employees::list_all_employees,
        handlers::employees::add_employee,
        handlers::employees::switch_employee_role,
        handlers::employees::list_employees_by_kind,
        handlers::employees::create_employee,
        handlers::employees::get_employee,
        handlers::employees::update_employee,
        handlers::employees::remove_employee,

        // --- Branches ---
        handlers::branches::create_branch,
        handlers::branches::get_all_branches,
        handlers::branches::get_branch,
        handlers::branches::update_branch,
        handlers::branches::delete_branch,

        // --- Services ---
        handlers::services::create_service,
        handlers::services::get_all_services,
        handlers::services::get_service,
        handlers::services::update_service,
        handlers::services::delete_service,

        // --- Transactions ---
        handlers::transactions::create_transaction,
        handlers::transactions::list_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::confirm_transaction,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::UserProfile,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Employees ---
            models::employee::EmployeeKind,
            models::employee::StaffPosition,
            models::employee::Weekday,
            models::employee::ScheduleEntry,
            models::employee::Employee,
            models::employee::EmployeeProfile,
            models::employee::EmployeeOverview,

            // --- Appointments ---
            models::appointment::AppointmentStatus,
            models::appointment::Appointment,
            models::appointment::ServiceSummary,
            models::appointment::AppointmentDetails,

            // --- Reviews ---
            models::review::Review,
            models::review::ReviewDetails,

            // --- Branches / Services ---
            models::branch::Branch,
            models::branch::BranchDetails,
            models::service::Service,

            // --- Transactions ---
            models::transaction::PaymentMethod,
            models::transaction::TransactionStatus,
            models::transaction::TransactionDetails,
            models::transaction::ChargedService,
            models::transaction::Transaction,

            // --- Paginação ---
            common::pagination::Pagination,

            // --- Payloads ---
            handlers::users::UpdateUserPayload,
            handlers::appointments::OneOrMany,
            handlers::appointments::CreateAppointmentPayload,
            handlers::appointments::ForceCreateAppointmentPayload,
            handlers::appointments::ChangeStatusPayload,
            handlers::appointments::UpdateServicesPayload,
            handlers::employees::AddEmployeePayload,
            handlers::employees::CreateEmployeePayload,
            handlers::employees::UpdateEmployeePayload,
            handlers::employees::SwitchRolePayload,
            handlers::reviews::SubmitReviewPayload,
            handlers::branches::CreateBranchPayload,
            handlers::branches::UpdateBranchPayload,
            handlers::services::CreateServicePayload,
            handlers::services::UpdateServicePayload,
            handlers::transactions::CreateTransactionPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Appointments", description = "Ciclo de vida dos agendamentos"),
        (name = "Reviews", description = "Avaliações pós-atendimento"),
        (name = "Employees", description = "Diretório de funcionários e troca de papéis"),
        (name = "Branches", description = "Filiais"),
        (name = "Services", description = "Catálogo de serviços"),
        (name = "Transactions", description = "Registro de pagamentos no caixa")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
