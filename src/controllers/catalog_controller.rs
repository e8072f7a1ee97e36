use std::time::Duration;

use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::{
    CarFilterQuery, CarsResponse, FilterOptionsResponse, SuggestionsResponse,
    UpdateAvailabilityRequest,
};
use crate::models::Car;
use crate::repositories::CarRepository;
use crate::services::catalog_query_service::{self, CarFilter};
use crate::utils::errors::{not_found_error, validation_error, AppError};
use crate::utils::validation::validate_not_empty;

pub struct CatalogController {
    repository: CarRepository,
    lock_wait: Duration,
}

impl CatalogController {
    pub fn new(repository: CarRepository, lock_wait: Duration) -> Self {
        Self {
            repository,
            lock_wait,
        }
    }

    pub async fn list(&self, query: CarFilterQuery) -> Result<CarsResponse, AppError> {
        let cars = self.repository.load_catalog().await?;
        let criteria = CarFilter::from(query);

        if criteria.is_empty() {
            return Ok(CarsResponse { cars });
        }

        Ok(CarsResponse {
            cars: catalog_query_service::filter(&cars, &criteria),
        })
    }

    pub async fn get_by_vin(&self, vin: &str) -> Result<Car, AppError> {
        self.repository
            .find_by_vin(vin)
            .await?
            .ok_or_else(|| not_found_error("Car with VIN", vin))
    }

    pub async fn suggestions(&self, term: &str) -> Result<SuggestionsResponse, AppError> {
        let cars = self.repository.load_catalog().await?;
        Ok(SuggestionsResponse {
            suggestions: catalog_query_service::suggest(&cars, term),
        })
    }

    pub async fn filter_options(&self) -> Result<FilterOptionsResponse, AppError> {
        let cars = self.repository.load_catalog().await?;
        Ok(catalog_query_service::filter_options(&cars))
    }

    pub async fn update_availability(
        &self,
        request: UpdateAvailabilityRequest,
    ) -> Result<ApiResponse, AppError> {
        if validate_not_empty(&request.vin).is_err() {
            return Err(validation_error("vin", "A car VIN is required."));
        }

        let guard = self.repository.lock(self.lock_wait).await?;
        let car = self
            .repository
            .update_availability(&guard, request.vin.trim(), request.available)
            .await?;

        let message = format!(
            "Car VIN '{}' availability updated to {}.",
            car.vin, car.available
        );
        Ok(ApiResponse::success_with_message(message))
    }
}
