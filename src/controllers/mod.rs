pub mod catalog_controller;
pub mod order_controller;
