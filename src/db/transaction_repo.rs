use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::transaction::{PaymentMethod, Transaction, TransactionDetails},
};

pub struct NewTransaction {
    pub appointment_id: Uuid,
    pub customer_id: Uuid,
    pub cashier_id: Uuid,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub details: TransactionDetails,
    pub note: Option<String>,
}

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        new: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"INSERT INTO transactions
                   (appointment_id, customer_id, cashier_id, amount, payment_method, details, note)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(new.appointment_id)
        .bind(new.customer_id)
        .bind(new.cashier_id)
        .bind(new.amount)
        .bind(new.payment_method)
        .bind(Json(new.details.clone()))
        .bind(&new.note)
        .fetch_one(conn)
        .await?;
        Ok(transaction)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction =
            sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(transaction)
    }

    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        let items = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total.0))
    }

    pub async fn confirm(&self, id: Uuid) -> Result<Option<Transaction>, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"UPDATE transactions
               SET status = 'confirmed', confirmed_at = now()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(transaction)
    }
}
