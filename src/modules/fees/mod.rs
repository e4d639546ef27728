pub mod controllers;
pub mod models;
pub mod services;

pub use models::{FeeCalculationInput, FeeCalculationResult, FeeSchedule};
pub use services::FeeCalculator;
