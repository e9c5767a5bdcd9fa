use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// Máquina de estados do agendamento. pending é o estado inicial;
// canceled e completed são absorventes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    // Statuses que contam como "agendamento ativo" para as checagens de
    // disponibilidade.
    pub const ACTIVE: [AppointmentStatus; 2] =
        [AppointmentStatus::Pending, AppointmentStatus::Confirmed];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(AppointmentStatus::Pending),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "canceled" => Some(AppointmentStatus::Canceled),
            "completed" => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Canceled | AppointmentStatus::Completed
        )
    }

    // Guardas das transições. O override administrativo (changeStatus) não
    // passa por aqui de propósito.
    pub fn ensure_approvable(&self) -> Result<(), AppError> {
        if *self == AppointmentStatus::Pending {
            Ok(())
        } else {
            Err(AppError::Validation(
                "Only pending appointments can be approved".to_string(),
            ))
        }
    }

    pub fn ensure_completable(&self) -> Result<(), AppError> {
        if *self == AppointmentStatus::Confirmed {
            Ok(())
        } else {
            Err(AppError::Validation(
                "Only confirmed appointments can be completed".to_string(),
            ))
        }
    }

    pub fn ensure_cancelable(&self) -> Result<(), AppError> {
        if self.is_terminal() {
            Err(AppError::Validation(format!(
                "Cannot cancel {} appointment",
                self.as_str()
            )))
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    // None = "qualquer profissional"; o conflito de slot passa a ser por
    // filial e horário apenas.
    pub stylist_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub branch_id: Uuid,
    pub approved_by: Option<Uuid>,
    pub date: NaiveDate,
    #[schema(example = "10:00")]
    pub time: String,
    pub status: AppointmentStatus,
    pub note: Option<String>,
    pub transaction_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Resumo de serviço embutido nas leituras de agendamento.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = f64)]
    pub price: rust_decimal::Decimal,
    pub description: Option<String>,
}

// Agendamento com os campos de exibição juntados (cliente, profissional,
// filial) e os serviços carregados em seguida.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub stylist_id: Option<Uuid>,
    #[serde(skip)]
    pub service_ids: Vec<Uuid>,
    pub branch_id: Uuid,
    pub approved_by: Option<Uuid>,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,

    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub stylist_name: Option<String>,
    pub branch_name: Option<String>,
    pub branch_address: Option<String>,

    #[sqlx(skip)]
    pub services: Vec<ServiceSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_four_statuses_and_nothing_else() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::Canceled,
            AppointmentStatus::Completed,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("approved"), None);
        assert_eq!(AppointmentStatus::parse(""), None);
    }

    #[test]
    fn only_pending_can_be_approved() {
        assert!(AppointmentStatus::Pending.ensure_approvable().is_ok());
        for status in [
            AppointmentStatus::Confirmed,
            AppointmentStatus::Canceled,
            AppointmentStatus::Completed,
        ] {
            let err = status.ensure_approvable().unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn only_confirmed_can_be_completed() {
        assert!(AppointmentStatus::Confirmed.ensure_completable().is_ok());
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Canceled,
            AppointmentStatus::Completed,
        ] {
            assert!(status.ensure_completable().is_err());
        }
    }

    #[test]
    fn terminal_statuses_cannot_be_canceled() {
        assert!(AppointmentStatus::Pending.ensure_cancelable().is_ok());
        assert!(AppointmentStatus::Confirmed.ensure_cancelable().is_ok());

        let err = AppointmentStatus::Completed.ensure_cancelable().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "Cannot cancel completed appointment")
            }
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(AppointmentStatus::Canceled.ensure_cancelable().is_err());
    }

    #[test]
    fn active_set_is_pending_and_confirmed() {
        assert!(AppointmentStatus::ACTIVE.contains(&AppointmentStatus::Pending));
        assert!(AppointmentStatus::ACTIVE.contains(&AppointmentStatus::Confirmed));
        assert!(!AppointmentStatus::ACTIVE.contains(&AppointmentStatus::Canceled));
        assert!(!AppointmentStatus::ACTIVE.contains(&AppointmentStatus::Completed));
    }
}
