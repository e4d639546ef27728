pub mod fee_calculator;

pub use fee_calculator::FeeCalculator;
