pub mod account;
pub mod catalog;
pub mod errors;
pub mod order;
pub mod ports;
