use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::auth::Role;

// Discriminante do registro de funcionário. As três "coleções" do modelo
// antigo (stylist/staff/cashier) viraram uma tabela só com este kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "employee_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeKind {
    Stylist,
    Staff,
    Cashier,
}

impl EmployeeKind {
    // Token desconhecido vira None; quem chama decide se isso é resultado
    // vazio (leituras do diretório) ou erro de validação (troca de papel).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "stylist" => Some(EmployeeKind::Stylist),
            "staff" => Some(EmployeeKind::Staff),
            "cashier" => Some(EmployeeKind::Cashier),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Role {
        match self {
            EmployeeKind::Stylist => Role::Stylist,
            EmployeeKind::Staff => Role::Staff,
            EmployeeKind::Cashier => Role::Cashier,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeKind::Stylist => "stylist",
            EmployeeKind::Staff => "staff",
            EmployeeKind::Cashier => "cashier",
        }
    }

    // Rótulo para mensagens ("Stylist not found").
    pub fn title(&self) -> &'static str {
        match self {
            EmployeeKind::Stylist => "Stylist",
            EmployeeKind::Staff => "Staff",
            EmployeeKind::Cashier => "Cashier",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "staff_position", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffPosition {
    Receptionist,
    Manager,
}

impl StaffPosition {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "receptionist" => Some(StaffPosition::Receptionist),
            "manager" => Some(StaffPosition::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "monday" => Some(Weekday::Monday),
            "tuesday" => Some(Weekday::Tuesday),
            "wednesday" => Some(Weekday::Wednesday),
            "thursday" => Some(Weekday::Thursday),
            "friday" => Some(Weekday::Friday),
            "saturday" => Some(Weekday::Saturday),
            "sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

// Uma janela de expediente. Horários em HH:MM 24h, comparáveis como texto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day: Weekday,
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "17:00")]
    pub end_time: String,
}

// Linha da tabela employees.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub branch_id: Uuid,
    pub kind: EmployeeKind,
    pub position: Option<StaffPosition>,
    #[schema(value_type = Vec<ScheduleEntry>)]
    pub schedule: Json<Vec<ScheduleEntry>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

// Registro de funcionário com usuário e filial juntados para exibição.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: EmployeeKind,
    pub position: Option<StaffPosition>,
    #[schema(value_type = Vec<ScheduleEntry>)]
    pub schedule: Json<Vec<ScheduleEntry>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,

    pub username: String,
    pub email: String,
    pub phone: Option<String>,

    pub branch_id: Uuid,
    pub branch_name: String,
    pub branch_address: String,
}

// Linha da listagem agregada: um registro por usuário, com todos os papéis
// que ele acumula e o rank mais alto.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmployeeOverviewRow {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub user_roles: Vec<Role>,
    pub role_type: EmployeeKind,
    pub all_roles: Vec<EmployeeKind>,
    pub schedule: Json<Vec<ScheduleEntry>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub branch_id: Option<Uuid>,
    pub branch_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: bool,
    pub branch_id: Option<Uuid>,
    pub branch_name: Option<String>,
    pub highest_role: Role,
    pub role_type: EmployeeKind,
    pub all_roles: Vec<EmployeeKind>,
    #[schema(value_type = Vec<ScheduleEntry>)]
    pub schedule: Vec<ScheduleEntry>,
    pub created_at: DateTime<Utc>,
}

impl From<EmployeeOverviewRow> for EmployeeOverview {
    fn from(row: EmployeeOverviewRow) -> Self {
        let highest_role = crate::models::auth::highest_role(&row.user_roles);
        Self {
            user_id: row.user_id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            status: row.active,
            branch_id: row.branch_id,
            branch_name: row.branch_name,
            highest_role,
            role_type: row.role_type,
            all_roles: row.all_roles,
            schedule: row.schedule.0,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_accepts_the_three_concrete_roles_only() {
        assert_eq!(EmployeeKind::parse("stylist"), Some(EmployeeKind::Stylist));
        assert_eq!(EmployeeKind::parse(" STAFF "), Some(EmployeeKind::Staff));
        assert_eq!(EmployeeKind::parse("cashier"), Some(EmployeeKind::Cashier));
        assert_eq!(EmployeeKind::parse("admin"), None);
        assert_eq!(EmployeeKind::parse("user"), None);
        assert_eq!(EmployeeKind::parse(""), None);
    }

    #[test]
    fn kind_maps_to_matching_role_token() {
        assert_eq!(EmployeeKind::Stylist.as_role(), Role::Stylist);
        assert_eq!(EmployeeKind::Staff.as_role(), Role::Staff);
        assert_eq!(EmployeeKind::Cashier.as_role(), Role::Cashier);
    }

    #[test]
    fn schedule_entry_serializes_with_camel_case_keys() {
        let entry = ScheduleEntry {
            day: Weekday::Monday,
            start_time: "08:00".to_string(),
            end_time: "17:00".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["day"], "monday");
        assert_eq!(json["startTime"], "08:00");
        assert_eq!(json["endTime"], "17:00");
    }
}
