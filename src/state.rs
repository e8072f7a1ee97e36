//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{CarRepository, OrderRepository};
use crate::services::ReservationService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cars: CarRepository,
    pub orders: OrderRepository,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let cars = CarRepository::new(config.storage.cars_path());
        let orders = OrderRepository::new(config.storage.orders_path());
        Self {
            config,
            cars,
            orders,
        }
    }

    /// Servicio de reservas compartiendo los mismos repositorios (y locks)
    pub fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            self.cars.clone(),
            self.orders.clone(),
            self.config.max_rental_days,
            self.config.lock_wait(),
        )
    }
}
