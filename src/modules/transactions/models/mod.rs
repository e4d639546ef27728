pub mod fee_transaction;

pub use fee_transaction::{FeeTransaction, FeeTransactionStatus};
