use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::review::{Review, ReviewDetails},
};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        customer_id: Uuid,
        appointment_id: Uuid,
        rating: i16,
        comment: Option<&str>,
    ) -> Result<Review, AppError> {
        sqlx::query_as::<_, Review>(
            r#"INSERT INTO reviews (customer_id, appointment_id, rating, comment)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(customer_id)
        .bind(appointment_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // UNIQUE (customer_id, appointment_id) é o backstop da checagem
            // feita no serviço.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "You have already reviewed this appointment".to_string(),
                    );
                }
            }
            AppError::Database(e)
        })
    }

    pub async fn exists(
        &self,
        customer_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE customer_id = $1 AND appointment_id = $2)",
        )
        .bind(customer_id)
        .bind(appointment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.0)
    }

    pub async fn list_by_appointment(
        &self,
        appointment_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ReviewDetails>, i64), AppError> {
        let items = sqlx::query_as::<_, ReviewDetails>(
            r#"SELECT r.*, u.username AS customer_name
               FROM reviews r
               JOIN users u ON u.id = r.customer_id
               WHERE r.appointment_id = $1
               ORDER BY r.created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(appointment_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE appointment_id = $1")
                .bind(appointment_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((items, total.0))
    }

    pub async fn list_by_customer(
        &self,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ReviewDetails>, i64), AppError> {
        let items = sqlx::query_as::<_, ReviewDetails>(
            r#"SELECT r.*, u.username AS customer_name
               FROM reviews r
               JOIN users u ON u.id = r.customer_id
               WHERE r.customer_id = $1
               ORDER BY r.created_at DESC
               LIMIT $2 OFFSET $3"#,
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok((items, total.0))
    }

    pub async fn list_recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ReviewDetails>, i64), AppError> {
        let items = sqlx::query_as::<_, ReviewDetails>(
            r#"SELECT r.*, u.username AS customer_name
               FROM reviews r
               JOIN users u ON u.id = r.customer_id
               ORDER BY r.created_at DESC
               LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total.0))
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Cascata da exclusão de agendamento; roda na mesma transação.
    pub async fn delete_by_appointment(
        &self,
        conn: &mut PgConnection,
        appointment_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}
