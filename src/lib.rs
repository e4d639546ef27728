//! Fee and commission engine for a freelance marketplace.
//!
//! The core is [`modules::fees::FeeCalculator`], a pure function from a
//! calculation request to a fee and commission breakdown over an injected
//! [`modules::fees::FeeSchedule`]. Around it sit the transaction lifecycle
//! (apply, refund, dispute, commission payout), revenue analytics and an
//! actix-web HTTP surface.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod state;

// Re-export commonly used types
pub use modules::analytics;
pub use modules::fees;
pub use modules::transactions;
pub use state::AppState;
