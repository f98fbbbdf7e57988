pub mod account_service;
pub mod catalog_service;
pub mod credentials;
pub mod order_service;
