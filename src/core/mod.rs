pub mod currency;
pub mod error;
pub mod traits;

pub use currency::{round_money, Currency};
pub use error::{AppError, Result};
