//! Consultas sobre el catálogo
//!
//! Filtros, búsqueda y sugerencias sobre una copia del catálogo ya cargada.
//! Todo es determinista: misma colección y misma consulta, mismo resultado.

use std::collections::{BTreeSet, HashSet};

use crate::dto::catalog_dto::{CarFilterQuery, FilterOptionsResponse};
use crate::models::Car;

/// Máximo de sugerencias devueltas
pub const MAX_SUGGESTIONS: usize = 5;

/// Longitud mínima del término para sugerir
pub const MIN_SUGGESTION_TERM_LEN: usize = 2;

/// Criterios de filtrado, combinados con AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilter {
    pub car_type: Option<String>,
    pub brand: Option<String>,
    pub search_term: Option<String>,
}

impl From<CarFilterQuery> for CarFilter {
    fn from(query: CarFilterQuery) -> Self {
        Self {
            car_type: non_blank(query.car_type),
            brand: non_blank(query.brand),
            search_term: non_blank(query.search),
        }
    }
}

impl CarFilter {
    pub fn is_empty(&self) -> bool {
        self.car_type.is_none() && self.brand.is_none() && self.search_term.is_none()
    }

    pub fn matches(&self, car: &Car) -> bool {
        if let Some(ref car_type) = self.car_type {
            if &car.car_type != car_type {
                return false;
            }
        }

        if let Some(ref brand) = self.brand {
            if &car.brand != brand {
                return false;
            }
        }

        if let Some(ref term) = self.search_term {
            let term = term.to_lowercase();
            let in_description = car
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false);

            if !(car.brand.to_lowercase().contains(&term)
                || car.car_model.to_lowercase().contains(&term)
                || car.car_type.to_lowercase().contains(&term)
                || in_description)
            {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Aplicar el filtro conservando el orden del catálogo
pub fn filter(cars: &[Car], criteria: &CarFilter) -> Vec<Car> {
    cars.iter()
        .filter(|car| criteria.matches(car))
        .cloned()
        .collect()
}

/// Sugerencias de tipo/marca/modelo para un término parcial.
///
/// Primero los valores que empiezan por el término, después los que solo lo
/// contienen; dentro de cada grupo, en orden de aparición (tipo, marca, modelo
/// de cada coche).
pub fn suggest(cars: &[Car], partial_term: &str) -> Vec<String> {
    let term = partial_term.trim().to_lowercase();
    if term.chars().count() < MIN_SUGGESTION_TERM_LEN {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut prefix_matches = Vec::new();
    let mut contains_matches = Vec::new();

    for car in cars {
        for candidate in [&car.car_type, &car.brand, &car.car_model] {
            let lower = candidate.to_lowercase();
            if !lower.contains(&term) || !seen.insert(candidate.as_str()) {
                continue;
            }
            if lower.starts_with(&term) {
                prefix_matches.push(candidate.clone());
            } else {
                contains_matches.push(candidate.clone());
            }
        }
    }

    prefix_matches
        .into_iter()
        .chain(contains_matches)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Tipos y marcas distintos, ordenados, para los desplegables
pub fn filter_options(cars: &[Car]) -> FilterOptionsResponse {
    let types: BTreeSet<&str> = cars.iter().map(|c| c.car_type.as_str()).collect();
    let brands: BTreeSet<&str> = cars.iter().map(|c| c.brand.as_str()).collect();

    FilterOptionsResponse {
        types: types.into_iter().map(str::to_string).collect(),
        brands: brands.into_iter().map(str::to_string).collect(),
    }
}
