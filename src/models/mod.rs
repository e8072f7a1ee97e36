//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! a los documentos JSON `cars.json` y `orders.json`.

pub mod car;
pub mod order;
pub mod record;

pub use car::{Car, CarCollection};
pub use order::{CarSnapshot, CustomerSnapshot, Order, OrderCollection, OrderStatus, RentalSnapshot};
pub use record::Record;
