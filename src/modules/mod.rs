pub mod analytics;
pub mod fees;
pub mod health;
pub mod transactions;
