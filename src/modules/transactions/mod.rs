pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FeeTransaction, FeeTransactionStatus};
pub use repositories::{FeeTransactionRepository, InMemoryTransactionRepository};
pub use services::FeeTransactionService;
