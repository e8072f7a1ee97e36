//! Modelo de Order
//!
//! Un pedido se crea una sola vez al confirmar la reserva y nunca se modifica.
//! Guarda una copia (snapshot) del coche en el momento de la reserva.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Record;

/// Datos del cliente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    // El formulario antiguo guardaba `driversLicense`
    #[serde(alias = "driversLicense")]
    pub drivers_license_number: String,
}

/// Copia del coche en el momento de la reserva
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarSnapshot {
    pub vin: String,
    pub brand: String,
    pub car_model: String,
    // Los pedidos antiguos no guardaban el precio por día
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<f64>,
}

/// Datos del alquiler, con el precio calculado en el servidor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSnapshot {
    pub start_date: String,
    pub rental_period: u32,
    #[serde(with = "order_date_format")]
    pub order_date: NaiveDateTime,
    pub total_price: f64,
}

/// Estado del pedido
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    #[serde(other)]
    Unknown,
}

/// Pedido tal como se guarda en `orders.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub customer: CustomerSnapshot,
    pub car: CarSnapshot,
    pub rental: RentalSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// Documento `{ "orders": [...] }`, del más reciente al más antiguo.
///
/// Los pedidos existentes se reescriben exactamente como se leyeron, incluidos
/// los que no encajan con `Order`: un pedido nunca se pierde ni se modifica.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCollection {
    orders: Vec<Record<Order>>,
}

impl From<Vec<Order>> for OrderCollection {
    fn from(orders: Vec<Order>) -> Self {
        Self {
            orders: orders.into_iter().map(Record::Modified).collect(),
        }
    }
}

impl OrderCollection {
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter_map(Record::parsed)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Añadir un pedido nuevo como el más reciente
    pub fn add(&mut self, order: Order) {
        self.orders.insert(0, Record::Modified(order));
    }

    pub fn find_by_id(&self, order_id: &str) -> Option<&Order> {
        self.orders().find(|order| order.order_id == order_id)
    }

    /// También mira los registros no interpretados, para no repetir un id antiguo
    pub fn contains_id(&self, order_id: &str) -> bool {
        self.orders.iter().any(|record| match record.parsed() {
            Some(order) => order.order_id == order_id,
            None => {
                record
                    .raw()
                    .and_then(|raw| raw.get("orderId"))
                    .and_then(Value::as_str)
                    == Some(order_id)
            }
        })
    }

    /// Registros que no se pudieron leer como `Order`
    pub fn unparsed_count(&self) -> usize {
        self.orders.iter().filter(|record| record.is_unparsed()).count()
    }
}

/// `orderDate` se escribe como `YYYY-MM-DD HH:MM:SS`; al leer también se acepta RFC 3339
pub mod order_date_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| {
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Local).naive_local())
            })
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn legacy_order() -> serde_json::Value {
        json!({
            "orderId": "snapcar_665f1a2b3c4d5",
            "customer": {
                "name": "Kim",
                "phoneNumber": "010-1234-5678",
                "email": "kim@example.com",
                "driversLicenseNumber": "11-22-333333-44"
            },
            "car": { "vin": "V1", "brand": "Kia", "carModel": "K5" },
            "rental": {
                "startDate": "2024-06-01",
                "rentalPeriod": 2,
                "totalPrice": 120,
                "orderDate": "2024-05-30 14:05:09"
            }
        })
    }

    #[test]
    fn test_reads_legacy_order_without_status_or_price() {
        let order: Order = serde_json::from_value(legacy_order()).unwrap();
        assert_eq!(order.car.price_per_day, None);
        assert_eq!(order.status, None);
        assert_eq!(order.rental.total_price, 120.0);

        let back = serde_json::to_value(&order).unwrap();
        assert_eq!(back["rental"]["orderDate"], "2024-05-30 14:05:09");
        assert!(back.get("status").is_none());
    }

    #[test]
    fn test_order_date_accepts_rfc3339() {
        let mut raw = legacy_order();
        raw["rental"]["orderDate"] = json!("2024-05-30T14:05:09Z");
        assert!(serde_json::from_value::<Order>(raw).is_ok());
    }

    #[test]
    fn test_unknown_status_is_tolerated() {
        let mut raw = legacy_order();
        raw["status"] = json!("cancelled");
        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.status, Some(OrderStatus::Unknown));
    }

    #[test]
    fn test_reads_order_saved_by_the_old_form() {
        let raw = json!({
            "orderId": "ord_1717000000000abcde",
            "customer": {
                "name": "Lee",
                "phoneNumber": "010-0000-0000",
                "email": "lee@example.com",
                "driversLicense": "12-34-567890-12"
            },
            "car": { "vin": "V2", "brand": "Kia", "carModel": "K5", "pricePerDay": 60 },
            "rental": {
                "startDate": "2024-06-01",
                "rentalPeriod": 2,
                "orderDate": "2024-05-30T14:05:09.123Z",
                "totalPrice": 120
            },
            "status": "pending"
        });

        let order: Order = serde_json::from_value(raw).unwrap();
        assert_eq!(order.customer.drivers_license_number, "12-34-567890-12");
        assert_eq!(order.status, Some(OrderStatus::Pending));
    }

    #[test]
    fn test_mixed_collection_keeps_every_record() {
        let unreadable = json!({ "orderId": "ord_broken", "rental": { "totalPrice": null } });
        let raw = json!({ "orders": [legacy_order(), unreadable.clone()] });

        assert!(OrderCollection::default().is_empty());
        let mut collection: OrderCollection = serde_json::from_value(raw).unwrap();
        assert!(!collection.is_empty());
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.unparsed_count(), 1);
        assert!(collection.find_by_id("snapcar_665f1a2b3c4d5").is_some());
        assert!(collection.find_by_id("ord_broken").is_none());
        assert!(collection.contains_id("ord_broken"));

        let mut newest: Order = serde_json::from_value(legacy_order()).unwrap();
        newest.order_id = "snapcar_new".to_string();
        collection.add(newest);

        let back = serde_json::to_value(&collection).unwrap();
        assert_eq!(back["orders"][0]["orderId"], "snapcar_new");
        assert_eq!(back["orders"][1], legacy_order());
        assert_eq!(back["orders"][2], unreadable);
    }
}
