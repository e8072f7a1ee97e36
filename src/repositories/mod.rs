//! Repositorios de persistencia
//!
//! Cada colección vive en un documento JSON completo protegido por su propio lock.

pub mod car_repository;
pub mod collection_lock;
pub mod json_document;
pub mod order_repository;

pub use car_repository::CarRepository;
pub use collection_lock::{CollectionGuard, CollectionLock, LockedCollection};
pub use json_document::{DocumentState, JsonDocument, LoadedDocument, PreparedWrite};
pub use order_repository::OrderRepository;
