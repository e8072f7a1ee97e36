pub mod catalog_routes;
pub mod order_routes;
