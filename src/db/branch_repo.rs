use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::branch::{Branch, BranchDetails},
};

const DETAILS_QUERY: &str = r#"
    SELECT b.id, b.name, b.address, b.phone, b.manager_id, b.created_at,
           m.username AS manager_name, m.email AS manager_email
    FROM branches b
    LEFT JOIN users m ON m.id = b.manager_id
"#;

#[derive(Clone)]
pub struct BranchRepository {
    pool: PgPool,
}

impl BranchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        name: &str,
        address: &str,
        phone: &str,
        manager_id: Option<Uuid>,
    ) -> Result<Branch, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"INSERT INTO branches (name, address, phone, manager_id)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(branch)
    }

    pub async fn list(&self) -> Result<Vec<BranchDetails>, AppError> {
        let sql = format!("{DETAILS_QUERY} ORDER BY b.created_at DESC");
        let branches = sqlx::query_as::<_, BranchDetails>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(branches)
    }

    pub async fn details_by_id(&self, id: Uuid) -> Result<Option<BranchDetails>, AppError> {
        let sql = format!("{DETAILS_QUERY} WHERE b.id = $1");
        let branch = sqlx::query_as::<_, BranchDetails>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(branch)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        manager_id: Option<Uuid>,
    ) -> Result<Option<Branch>, AppError> {
        let branch = sqlx::query_as::<_, Branch>(
            r#"UPDATE branches
               SET name = COALESCE($2, name),
                   address = COALESCE($3, address),
                   phone = COALESCE($4, phone),
                   manager_id = COALESCE($5, manager_id)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(phone)
        .bind(manager_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(branch)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
