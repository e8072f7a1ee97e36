use serde::{Deserialize, Serialize};

use crate::models::Car;

// Query de listado: `?type=&brand=&search=`; vacío equivale a "todos"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarFilterQuery {
    #[serde(rename = "type")]
    pub car_type: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
}

// Query de sugerencias: `?term=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionQuery {
    #[serde(default)]
    pub term: String,
}

// Response de listado con la misma forma que `cars.json`
#[derive(Debug, Serialize)]
pub struct CarsResponse {
    pub cars: Vec<Car>,
}

// Valores distintos para los desplegables de filtros
#[derive(Debug, Serialize, PartialEq)]
pub struct FilterOptionsResponse {
    pub types: Vec<String>,
    pub brands: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

// Request administrativa para cambiar la disponibilidad
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub vin: String,
    pub available: bool,
}
