//! Modelo de Car
//!
//! Entrada del catálogo tal como se guarda en `cars.json`. El campo `vin`
//! es la clave única y `available` es la única fuente de verdad para saber
//! si un coche se puede alquilar.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::Record;

/// Coche del catálogo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub vin: String,
    pub brand: String,
    pub car_model: String,
    pub year_of_manufacture: u16,
    pub car_type: String,
    pub fuel_type: String,
    pub mileage: u64,
    pub price_per_day: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available: bool,
    /// Campos del seed que este servicio no interpreta; se conservan al reescribir
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Documento `{ "cars": [...] }`
///
/// Las entradas que no encajan con `Car` se conservan sin tocar al reescribir,
/// pero no forman parte del catálogo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarCollection {
    cars: Vec<Record<Car>>,
}

impl From<Vec<Car>> for CarCollection {
    fn from(cars: Vec<Car>) -> Self {
        Self {
            cars: cars.into_iter().map(Record::Modified).collect(),
        }
    }
}

impl CarCollection {
    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.cars.iter().filter_map(Record::parsed)
    }

    pub fn into_cars(self) -> Vec<Car> {
        self.cars
            .into_iter()
            .filter_map(|record| match record {
                Record::Stored { parsed, .. } => parsed,
                Record::Modified(car) => Some(car),
            })
            .collect()
    }

    pub fn find_by_vin(&self, vin: &str) -> Option<&Car> {
        self.cars().find(|car| car.vin == vin)
    }

    pub fn find_by_vin_mut(&mut self, vin: &str) -> Option<&mut Car> {
        self.cars
            .iter_mut()
            .find(|record| record.parsed().map_or(false, |car| car.vin == vin))
            .and_then(Record::parsed_mut)
    }

    /// Entradas que no se pudieron leer como `Car`
    pub fn unparsed_count(&self) -> usize {
        self.cars.iter().filter(|record| record.is_unparsed()).count()
    }
}
