//! Built-in services.

pub mod pizza;

pub use pizza::PizzaService;
