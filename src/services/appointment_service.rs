use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::Page,
        validation::{is_valid_hhmm, parse_date, parse_id},
    },
    db::{
        AppointmentRepository, EmployeeRepository, NewAppointment, ReviewRepository,
        ServiceRepository, UserRepository,
    },
    models::{
        appointment::{Appointment, AppointmentDetails, AppointmentStatus},
        auth::{Role, User},
        employee::EmployeeKind,
    },
};

// Campos de uma solicitação de agendamento, já destacados do transporte.
// Ids chegam como texto e são validados aqui, antes de qualquer consulta.
pub struct BookingRequest {
    pub stylist_user_id: Option<String>,
    pub service_ids: Vec<String>,
    pub branch_id: String,
    pub date: String,
    pub time: String,
    pub note: Option<String>,
}

struct ValidatedBooking {
    stylist_id: Option<Uuid>,
    service_ids: Vec<Uuid>,
    branch_id: Uuid,
    date: chrono::NaiveDate,
    time: String,
    note: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentService {
    appointment_repo: AppointmentRepository,
    employee_repo: EmployeeRepository,
    user_repo: UserRepository,
    service_repo: ServiceRepository,
    review_repo: ReviewRepository,
    pool: PgPool,
}

impl AppointmentService {
    pub fn new(
        appointment_repo: AppointmentRepository,
        employee_repo: EmployeeRepository,
        user_repo: UserRepository,
        service_repo: ServiceRepository,
        review_repo: ReviewRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            appointment_repo,
            employee_repo,
            user_repo,
            service_repo,
            review_repo,
            pool,
        }
    }

    // Validação comum ao create e ao force-create: formatos de id, data e
    // horário, e resolução do stylist (o id recebido é o user id do
    // profissional; o agendamento guarda o id do registro de funcionário).
    async fn validate_booking(&self, request: &BookingRequest) -> Result<ValidatedBooking, AppError> {
        if request.service_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one service is required".to_string(),
            ));
        }

        let branch_id = parse_id(&request.branch_id, "branch ID")?;
        let mut service_ids = Vec::with_capacity(request.service_ids.len());
        for raw in &request.service_ids {
            service_ids.push(parse_id(raw, "service ID")?);
        }

        let date = parse_date(&request.date)?;
        if !is_valid_hhmm(&request.time) {
            return Err(AppError::Validation(
                "Invalid time, expected HH:MM".to_string(),
            ));
        }

        let stylist_id = match &request.stylist_user_id {
            Some(raw) => {
                let stylist_user_id = parse_id(raw, "stylist ID")?;
                let stylist = self
                    .employee_repo
                    .find_by_user_and_kind(stylist_user_id, EmployeeKind::Stylist)
                    .await?
                    .ok_or(AppError::NotFound("Stylist"))?;
                Some(stylist.id)
            }
            None => None,
        };

        Ok(ValidatedBooking {
            stylist_id,
            service_ids,
            branch_id,
            date,
            time: request.time.clone(),
            note: request.note.clone(),
        })
    }

    // Criação pelo cliente: passa pelas duas checagens consultivas de
    // disponibilidade. Sem lock — duas requisições simultâneas podem passar
    // as duas; a corrida é aceita pelo desenho.
    pub async fn create(
        &self,
        customer_id: Uuid,
        request: BookingRequest,
    ) -> Result<Appointment, AppError> {
        let booking = self.validate_booking(&request).await?;

        if self
            .appointment_repo
            .has_active_for_customer(customer_id)
            .await?
        {
            return Err(AppError::Forbidden(
                "Not available - You have an active appointment".to_string(),
            ));
        }

        if self
            .appointment_repo
            .has_slot_conflict(
                booking.branch_id,
                booking.stylist_id,
                booking.date,
                &booking.time,
            )
            .await?
        {
            return Err(AppError::Conflict(
                "Not available - Time slot conflict".to_string(),
            ));
        }

        self.insert_booking(customer_id, booking).await
    }

    // Caminho administrativo: resolve o cliente por e-mail e pula as duas
    // checagens de disponibilidade de propósito.
    pub async fn force_create(
        &self,
        customer_email: &str,
        request: BookingRequest,
    ) -> Result<Appointment, AppError> {
        let customer = self
            .user_repo
            .find_by_email(customer_email)
            .await?
            .ok_or(AppError::NotFound("Customer"))?;

        let booking = self.validate_booking(&request).await?;
        self.insert_booking(customer.id, booking).await
    }

    async fn insert_booking(
        &self,
        customer_id: Uuid,
        booking: ValidatedBooking,
    ) -> Result<Appointment, AppError> {
        self.appointment_repo
            .insert(&NewAppointment {
                customer_id,
                stylist_id: booking.stylist_id,
                service_ids: booking.service_ids,
                branch_id: booking.branch_id,
                date: booking.date,
                time: booking.time,
                note: booking.note,
            })
            .await
    }

    // Aprovação: o ator precisa resolver para um registro de staff.
    pub async fn approve(
        &self,
        actor_user_id: Uuid,
        appointment_id: &str,
    ) -> Result<Appointment, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        let staff = self
            .employee_repo
            .find_by_user_and_kind(actor_user_id, EmployeeKind::Staff)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not authorized to approve appointments".to_string())
            })?;

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        appointment.status.ensure_approvable()?;

        self.appointment_repo
            .approve(appointment.id, staff.id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    // Conclusão: o ator precisa resolver para um registro de stylist e,
    // se o agendamento tem profissional atribuído, precisa ser ele.
    pub async fn complete(
        &self,
        actor_user_id: Uuid,
        appointment_id: &str,
    ) -> Result<Appointment, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        let stylist = self
            .employee_repo
            .find_by_user_and_kind(actor_user_id, EmployeeKind::Stylist)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not authorized to complete appointments".to_string())
            })?;

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        if let Some(assigned) = appointment.stylist_id {
            if assigned != stylist.id {
                return Err(AppError::Forbidden(
                    "Only the assigned stylist can complete this appointment".to_string(),
                ));
            }
        }

        appointment.status.ensure_completable()?;

        self.appointment_repo
            .set_status(appointment.id, AppointmentStatus::Completed)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    // Cancelamento: dono do agendamento ou admin.
    pub async fn cancel(
        &self,
        actor: &User,
        appointment_id: &str,
    ) -> Result<Appointment, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        if !actor.has_role(Role::Admin) && appointment.customer_id != actor.id {
            return Err(AppError::Forbidden(
                "You cannot cancel this appointment".to_string(),
            ));
        }

        appointment.status.ensure_cancelable()?;

        self.appointment_repo
            .set_status(appointment.id, AppointmentStatus::Canceled)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    // Override administrativo: valida o enum e aplica sem guarda de
    // transição. Idempotente por construção.
    pub async fn change_status(
        &self,
        appointment_id: &str,
        status: &str,
    ) -> Result<Appointment, AppError> {
        let status = AppointmentStatus::parse(status)
            .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        self.appointment_repo
            .set_status(appointment_id, status)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    // Reatribuição de serviços pelo profissional responsável.
    pub async fn update_services(
        &self,
        actor_user_id: Uuid,
        appointment_id: &str,
        service_ids: &[String],
    ) -> Result<Appointment, AppError> {
        if service_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one service is required".to_string(),
            ));
        }
        let appointment_id = parse_id(appointment_id, "appointment ID")?;
        let mut parsed = Vec::with_capacity(service_ids.len());
        for raw in service_ids {
            parsed.push(parse_id(raw, "service ID")?);
        }

        let appointment = self
            .appointment_repo
            .find_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        let stylist = self
            .employee_repo
            .find_by_user_and_kind(actor_user_id, EmployeeKind::Stylist)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("You are not authorized to update services".to_string())
            })?;

        if appointment.stylist_id != Some(stylist.id) {
            return Err(AppError::Forbidden(
                "You are not assigned to this appointment".to_string(),
            ));
        }

        self.appointment_repo
            .set_services(appointment.id, &parsed)
            .await?
            .ok_or(AppError::NotFound("Appointment"))
    }

    // Exclusão administrativa, com cascata nas avaliações na mesma
    // transação.
    pub async fn delete(&self, appointment_id: &str) -> Result<Appointment, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        let mut tx = self.pool.begin().await?;
        self.review_repo
            .delete_by_appointment(&mut *tx, appointment_id)
            .await?;
        let appointment = self
            .appointment_repo
            .delete(&mut *tx, appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;
        tx.commit().await?;

        Ok(appointment)
    }

    pub async fn get_by_id(&self, appointment_id: &str) -> Result<AppointmentDetails, AppError> {
        let appointment_id = parse_id(appointment_id, "appointment ID")?;

        let mut details = self
            .appointment_repo
            .details_by_id(appointment_id)
            .await?
            .ok_or(AppError::NotFound("Appointment"))?;

        self.attach_services(std::slice::from_mut(&mut details))
            .await?;
        Ok(details)
    }

    pub async fn get_by_user(
        &self,
        user_id: Uuid,
        status: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<Page<AppointmentDetails>, AppError> {
        // "all" (ou ausência) desliga o filtro; qualquer outro token precisa
        // ser um status válido.
        let status = match status {
            None => None,
            Some(raw) if raw.eq_ignore_ascii_case("all") => None,
            Some(raw) => Some(
                AppointmentStatus::parse(raw)
                    .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?,
            ),
        };

        let (mut items, total) = self
            .appointment_repo
            .list_by_customer(user_id, status, limit, (page - 1) * limit)
            .await?;
        self.attach_services(&mut items).await?;

        Ok(Page::new(items, total, page, limit))
    }

    // Carrega os resumos de serviço de um lote de agendamentos com uma
    // consulta só e distribui por item.
    async fn attach_services(&self, items: &mut [AppointmentDetails]) -> Result<(), AppError> {
        let mut all_ids: Vec<Uuid> = items
            .iter()
            .flat_map(|a| a.service_ids.iter().copied())
            .collect();
        all_ids.sort_unstable();
        all_ids.dedup();

        if all_ids.is_empty() {
            return Ok(());
        }

        let summaries = self.service_repo.summaries(&all_ids).await?;
        let by_id: HashMap<Uuid, _> = summaries.into_iter().map(|s| (s.id, s)).collect();

        for item in items.iter_mut() {
            item.services = item
                .service_ids
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect();
        }
        Ok(())
    }
}
