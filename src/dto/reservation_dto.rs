use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::utils::validation::{validate_not_empty, EMAIL_REGEX};

// Datos del cliente tal como llegan del formulario
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    #[validate(custom(function = "validate_not_empty", message = "Please enter your name."))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_empty", message = "Please enter a valid phone number."))]
    pub phone_number: String,

    #[serde(default)]
    #[validate(regex(path = "EMAIL_REGEX", message = "Please enter a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_empty", message = "Please enter your driver's license number."))]
    pub drivers_license_number: String,
}

// Datos del alquiler; el precio nunca se acepta del cliente
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalInfo {
    #[serde(default)]
    pub start_date: String,

    /// `None` cuando falta o no es un número entero de días
    #[serde(default, deserialize_with = "deserialize_whole_days")]
    pub rental_period: Option<i64>,
}

// Request canónica para crear un pedido
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default)]
    pub rental: RentalInfo,
    #[serde(default)]
    pub car_vin: String,
}

// Response de reserva confirmada
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub success: bool,
    pub message: String,
    pub order_id: String,
}

impl ReservationResponse {
    pub fn confirmed(order_id: String) -> Self {
        Self {
            success: true,
            message: "Your reservation has been confirmed successfully!".to_string(),
            order_id,
        }
    }
}

/// Acepta `3`, `3.0` o `"3"`; cualquier otra cosa queda como `None`
fn deserialize_whole_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let days = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(days)
}
