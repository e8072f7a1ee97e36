//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: consultas
//! sobre el catálogo y el flujo de reserva.

pub mod catalog_query_service;
pub mod reservation_service;

pub use catalog_query_service::CarFilter;
pub use reservation_service::ReservationService;
