use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Um serviço do catálogo (corte, coloração...). `available` tira o serviço
// de circulação sem apagar o histórico.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub duration_minutes: i32,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}
