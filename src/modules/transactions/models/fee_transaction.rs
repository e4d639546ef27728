use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::fees::models::{FeeCalculationResult, FeeStatus};

/// Lifecycle of fees that have been charged on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTransactionStatus {
    /// Fees charged against the project payout
    Applied,
    /// Charge contested by the user, awaiting resolution
    Disputed,
    /// Fees and commissions returned
    Refunded,
}

impl std::fmt::Display for FeeTransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeTransactionStatus::Applied => write!(f, "applied"),
            FeeTransactionStatus::Disputed => write!(f, "disputed"),
            FeeTransactionStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// A fee calculation that has been applied to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTransaction {
    pub id: Uuid,
    pub project_id: String,
    pub user_id: String,
    pub calculation: FeeCalculationResult,
    pub status: FeeTransactionStatus,
    /// Reason given for the latest refund or dispute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeeTransaction {
    /// Record an applied calculation
    pub fn applied(calculation: FeeCalculationResult, processed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: calculation.input.project_id.clone(),
            user_id: calculation.input.user_id.clone(),
            calculation,
            status: FeeTransactionStatus::Applied,
            status_reason: None,
            processed_at,
            updated_at: processed_at,
        }
    }

    pub fn is_refunded(&self) -> bool {
        self.status == FeeTransactionStatus::Refunded
    }

    /// Mark payable commissions as paid out
    ///
    /// Commissions below the recipient's minimum payout stay pending.
    /// Returns how many commissions changed state.
    pub fn settle_commissions(&mut self, now: DateTime<Utc>) -> Result<usize> {
        if self.status != FeeTransactionStatus::Applied {
            return Err(AppError::invalid_transition(format!(
                "Commissions can only be processed for applied transactions, transaction {} is {}",
                self.id, self.status
            )));
        }

        let mut settled = 0;
        for commission in &mut self.calculation.commissions {
            if commission.status == FeeStatus::Pending && commission.is_payable() {
                commission.status = FeeStatus::Applied;
                settled += 1;
            }
        }

        if settled > 0 {
            self.updated_at = now;
        }
        Ok(settled)
    }

    pub fn refund(&mut self, reason: &str, now: DateTime<Utc>) -> Result<()> {
        let reason = require_reason(reason)?;
        if self.is_refunded() {
            return Err(AppError::invalid_transition(format!(
                "Transaction {} is already refunded",
                self.id
            )));
        }

        for commission in &mut self.calculation.commissions {
            commission.status = FeeStatus::Refunded;
        }
        for fee in &mut self.calculation.fees {
            fee.applied = false;
        }

        self.status = FeeTransactionStatus::Refunded;
        self.status_reason = Some(reason);
        self.updated_at = now;
        Ok(())
    }

    pub fn dispute(&mut self, reason: &str, now: DateTime<Utc>) -> Result<()> {
        let reason = require_reason(reason)?;
        if self.status != FeeTransactionStatus::Applied {
            return Err(AppError::invalid_transition(format!(
                "Only applied transactions can be disputed, transaction {} is {}",
                self.id, self.status
            )));
        }

        self.status = FeeTransactionStatus::Disputed;
        self.status_reason = Some(reason);
        self.updated_at = now;
        Ok(())
    }
}

fn require_reason(reason: &str) -> Result<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("A reason is required"));
    }
    Ok(reason.to_string())
}
