use chrono::NaiveDate;
use uuid::Uuid;
use validator::ValidationError;

use crate::common::error::AppError;

// Ids chegam como texto (path params, payloads, claims externas) e são
// validados antes de qualquer consulta. Id malformado é erro do cliente,
// não falha de lookup.
pub fn parse_id(value: &str, label: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| AppError::Validation(format!("Invalid {label}")))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date, expected YYYY-MM-DD".to_string()))
}

// Horários são strings HH:MM em 24h, comparáveis lexicograficamente.
pub fn is_valid_hhmm(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return false;
    }
    let (Ok(h), Ok(m)) = (hours.parse::<u8>(), minutes.parse::<u8>()) else {
        return false;
    };
    h < 24 && m < 60
}

// Validador custom para campos `time` dos payloads.
pub fn validate_time_hhmm(value: &str) -> Result<(), ValidationError> {
    if is_valid_hhmm(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("invalid_time");
        err.message = Some("expected HH:MM in 24h format".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_canonical_uuid() {
        let id = parse_id("550e8400-e29b-41d4-a716-446655440000", "User ID").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn parse_id_rejects_garbage_with_validation_error() {
        let err = parse_id("not-a-uuid", "User ID").unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(msg, "Invalid User ID"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn parse_date_accepts_iso_and_rejects_others() {
        assert!(parse_date("2024-06-01").is_ok());
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn hhmm_validation_covers_bounds() {
        assert!(is_valid_hhmm("00:00"));
        assert!(is_valid_hhmm("09:30"));
        assert!(is_valid_hhmm("23:59"));
        assert!(!is_valid_hhmm("24:00"));
        assert!(!is_valid_hhmm("10:60"));
        assert!(!is_valid_hhmm("9:30"));
        assert!(!is_valid_hhmm("0930"));
        assert!(!is_valid_hhmm(""));
    }
}
