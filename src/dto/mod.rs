//! DTOs de la API
//!
//! Formas de request/response expuestas al storefront.

pub mod api_response;
pub mod catalog_dto;
pub mod reservation_dto;
