//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y generación de identificadores.

pub mod errors;
pub mod order_id;
pub mod validation;
