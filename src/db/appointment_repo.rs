use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::appointment::{Appointment, AppointmentDetails, AppointmentStatus},
};

const DETAILS_QUERY: &str = r#"
    SELECT a.id, a.customer_id, a.stylist_id, a.service_ids, a.branch_id,
           a.approved_by, a.date, a.time, a.status, a.note, a.created_at,
           u.username AS customer_name, u.email AS customer_email, u.phone AS customer_phone,
           su.username AS stylist_name,
           b.name AS branch_name, b.address AS branch_address
    FROM appointments a
    JOIN users u ON u.id = a.customer_id
    LEFT JOIN employees se ON se.id = a.stylist_id
    LEFT JOIN users su ON su.id = se.user_id
    LEFT JOIN branches b ON b.id = a.branch_id
"#;

pub struct NewAppointment {
    pub customer_id: Uuid,
    pub stylist_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub branch_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: &NewAppointment) -> Result<Appointment, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointments
                   (customer_id, stylist_id, service_ids, branch_id, date, time, note)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(new.customer_id)
        .bind(new.stylist_id)
        .bind(new.service_ids.clone())
        .bind(new.branch_id)
        .bind(new.date)
        .bind(&new.time)
        .bind(&new.note)
        .fetch_one(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, AppError> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(appointment)
    }

    // Checagem consultiva: o cliente já segura um agendamento não resolvido?
    pub async fn has_active_for_customer(&self, customer_id: Uuid) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            r#"SELECT EXISTS (
                   SELECT 1 FROM appointments
                   WHERE customer_id = $1 AND status = ANY($2)
               )"#,
        )
        .bind(customer_id)
        .bind(AppointmentStatus::ACTIVE.to_vec())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    // Conflito de slot: mesma filial, mesmo dia de calendário e mesmo
    // horário exato. Com stylist informado a checagem restringe a ele;
    // sem stylist, filial e horário bastam.
    pub async fn has_slot_conflict(
        &self,
        branch_id: Uuid,
        stylist_id: Option<Uuid>,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            r#"SELECT EXISTS (
                   SELECT 1 FROM appointments
                   WHERE branch_id = $1
                     AND date = $2
                     AND time = $3
                     AND status = ANY($4)
                     AND ($5::uuid IS NULL OR stylist_id = $5)
               )"#,
        )
        .bind(branch_id)
        .bind(date)
        .bind(time)
        .bind(AppointmentStatus::ACTIVE.to_vec())
        .bind(stylist_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    pub async fn approve(
        &self,
        id: Uuid,
        staff_employee_id: Uuid,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"UPDATE appointments
               SET status = 'confirmed', approved_by = $2
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(staff_employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn set_services(
        &self,
        id: Uuid,
        service_ids: &[Uuid],
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET service_ids = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(service_ids.to_vec())
        .fetch_optional(&self.pool)
        .await?;
        Ok(appointment)
    }

    pub async fn set_transaction(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        transaction_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE appointments SET transaction_id = $2 WHERE id = $1")
            .bind(id)
            .bind(transaction_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    // Delete devolvendo a linha; roda na transação que também apaga as
    // avaliações do agendamento.
    pub async fn delete(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Appointment>, AppError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "DELETE FROM appointments WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(appointment)
    }

    pub async fn details_by_id(&self, id: Uuid) -> Result<Option<AppointmentDetails>, AppError> {
        let sql = format!("{DETAILS_QUERY} WHERE a.id = $1");
        let details = sqlx::query_as::<_, AppointmentDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(details)
    }

    pub async fn list_by_customer(
        &self,
        customer_id: Uuid,
        status: Option<AppointmentStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AppointmentDetails>, i64), AppError> {
        let sql = format!(
            r#"{DETAILS_QUERY}
               WHERE a.customer_id = $1 AND ($2::appointment_status IS NULL OR a.status = $2)
               ORDER BY a.created_at DESC
               LIMIT $3 OFFSET $4"#
        );
        let items = sqlx::query_as::<_, AppointmentDetails>(&sql)
            .bind(customer_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: (i64,) = sqlx::query_as(
            r#"SELECT COUNT(*) FROM appointments a
               WHERE a.customer_id = $1 AND ($2::appointment_status IS NULL OR a.status = $2)"#,
        )
        .bind(customer_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total.0))
    }
}
