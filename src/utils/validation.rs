//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Mismo patrón que usa el formulario de reserva del storefront
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que una fecha no sea anterior a `today`
pub fn validate_not_before(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date < today {
        let mut error = ValidationError::new("date_in_past");
        error.add_param("value".into(), &date.to_string());
        error.add_param("min".into(), &today.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio sea positivo y finito
pub fn validate_positive_price(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_not_before() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(validate_not_before(today, today).is_ok());
        assert!(validate_not_before(today.succ_opt().unwrap(), today).is_ok());
        assert!(validate_not_before(today.pred_opt().unwrap(), today).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Jane").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(5, 1, 30).is_ok());
        assert!(validate_range(1, 1, 30).is_ok());
        assert!(validate_range(30, 1, 30).is_ok());
        assert!(validate_range(0, 1, 30).is_err());
        assert!(validate_range(31, 1, 30).is_err());
    }

    #[test]
    fn test_email_regex() {
        assert!(EMAIL_REGEX.is_match("test@example.com"));
        assert!(!EMAIL_REGEX.is_match("not-an-email"));
        assert!(!EMAIL_REGEX.is_match("test@"));
        assert!(!EMAIL_REGEX.is_match("test@example"));
        assert!(!EMAIL_REGEX.is_match("te st@example.com"));
    }

    #[test]
    fn test_validate_positive_price() {
        assert!(validate_positive_price(50.0).is_ok());
        assert!(validate_positive_price(0.0).is_err());
        assert!(validate_positive_price(-1.0).is_err());
        assert!(validate_positive_price(f64::NAN).is_err());
    }
}
