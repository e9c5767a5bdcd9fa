use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{appointment::ServiceSummary, service::Service},
};

#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"INSERT INTO services (name, description, price, duration_minutes)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(service)
    }

    pub async fn list(&self, only_available: bool) -> Result<Vec<Service>, AppError> {
        let services = sqlx::query_as::<_, Service>(
            r#"SELECT * FROM services
               WHERE ($1 = FALSE OR available = TRUE)
               ORDER BY created_at DESC"#,
        )
        .bind(only_available)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<Decimal>,
        duration_minutes: Option<i32>,
        available: Option<bool>,
    ) -> Result<Option<Service>, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"UPDATE services
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   price = COALESCE($4, price),
                   duration_minutes = COALESCE($5, duration_minutes),
                   available = COALESCE($6, available)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(duration_minutes)
        .bind(available)
        .fetch_optional(&self.pool)
        .await?;
        Ok(service)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Resumo dos serviços referenciados por um agendamento, para exibição.
    pub async fn summaries(&self, ids: &[Uuid]) -> Result<Vec<ServiceSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ServiceSummary>(
            "SELECT id, name, price, description FROM services WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    // Só serviços disponíveis entram no cálculo do valor de uma transação.
    pub async fn available_summaries(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ServiceSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ServiceSummary>(
            r#"SELECT id, name, price, description
               FROM services
               WHERE id = ANY($1) AND available = TRUE"#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }
}
