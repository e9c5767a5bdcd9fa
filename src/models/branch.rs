use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Filial com os dados do gerente juntados para exibição.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchDetails {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub manager_name: Option<String>,
    pub manager_email: Option<String>,
}
