pub mod cart_service;
pub mod checkout;
pub mod single_flight;
