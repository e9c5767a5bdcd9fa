use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub appointment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Avaliação com o nome do cliente juntado, para as listagens.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub appointment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer_name: String,
}

// Alvos aceitos por GET /reviews/{kind}/{id}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTarget {
    Appointment,
    Customer,
}

impl ReviewTarget {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "appointment" => Some(ReviewTarget::Appointment),
            "customer" => Some(ReviewTarget::Customer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_parse_accepts_appointment_and_customer_only() {
        assert_eq!(
            ReviewTarget::parse("appointment"),
            Some(ReviewTarget::Appointment)
        );
        assert_eq!(ReviewTarget::parse("Customer"), Some(ReviewTarget::Customer));
        assert_eq!(ReviewTarget::parse("stylist"), None);
    }
}
