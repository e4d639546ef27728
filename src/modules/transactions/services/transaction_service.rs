use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::fees::models::{FeeCalculationInput, FeeCalculationResult, FeeStatus};
use crate::modules::fees::FeeCalculator;
use crate::modules::transactions::models::FeeTransaction;
use crate::modules::transactions::repositories::FeeTransactionRepository;

/// Applies calculated fees and drives their refund and dispute lifecycle
pub struct FeeTransactionService {
    calculator: Arc<FeeCalculator>,
    transaction_repo: Arc<dyn FeeTransactionRepository>,
}

impl FeeTransactionService {
    pub fn new(
        calculator: Arc<FeeCalculator>,
        transaction_repo: Arc<dyn FeeTransactionRepository>,
    ) -> Self {
        Self {
            calculator,
            transaction_repo,
        }
    }

    /// Calculate fees for a project and record them as applied
    pub async fn calculate_and_apply(&self, input: &FeeCalculationInput) -> Result<FeeTransaction> {
        let calculation = self.calculator.calculate(input)?;
        self.apply_fees(calculation).await
    }

    /// Record an already computed calculation as applied
    pub async fn apply_fees(&self, calculation: FeeCalculationResult) -> Result<FeeTransaction> {
        let transaction = FeeTransaction::applied(calculation, Utc::now());
        let transaction = self.transaction_repo.create(transaction).await?;

        info!(
            transaction_id = %transaction.id,
            project_id = %transaction.project_id,
            total_fees = %transaction.calculation.total_fees(),
            "Fees applied"
        );

        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: Uuid) -> Result<FeeTransaction> {
        self.transaction_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Fee transaction {}", id)))
    }

    pub async fn list_transactions(&self, limit: u32, offset: u32) -> Result<Vec<FeeTransaction>> {
        if limit == 0 || limit > 500 {
            return Err(AppError::validation("limit must be between 1 and 500"));
        }
        self.transaction_repo.list(Some(limit), Some(offset)).await
    }

    /// Settle pending commissions that reach their payout threshold
    pub async fn process_commissions(&self, id: Uuid) -> Result<FeeTransaction> {
        let transaction = self
            .transaction_repo
            .modify(
                id,
                Box::new(|tx: &mut FeeTransaction| {
                    tx.settle_commissions(Utc::now()).map(|_| ())
                }),
            )
            .await?;

        let paid_out = transaction
            .calculation
            .commissions
            .iter()
            .filter(|c| c.status == FeeStatus::Applied)
            .count();
        info!(transaction_id = %id, paid_out, "Commissions processed");

        Ok(transaction)
    }

    pub async fn refund_fees(&self, id: Uuid, reason: &str) -> Result<FeeTransaction> {
        let reason = reason.to_string();
        let transaction = self
            .transaction_repo
            .modify(
                id,
                Box::new(move |tx: &mut FeeTransaction| tx.refund(&reason, Utc::now())),
            )
            .await?;

        warn!(
            transaction_id = %id,
            refunded = %transaction.calculation.total_fees(),
            reason = transaction.status_reason.as_deref().unwrap_or_default(),
            "Fees refunded"
        );

        Ok(transaction)
    }

    pub async fn dispute_fees(&self, id: Uuid, reason: &str) -> Result<FeeTransaction> {
        let reason = reason.to_string();
        let transaction = self
            .transaction_repo
            .modify(
                id,
                Box::new(move |tx: &mut FeeTransaction| tx.dispute(&reason, Utc::now())),
            )
            .await?;

        warn!(
            transaction_id = %id,
            reason = transaction.status_reason.as_deref().unwrap_or_default(),
            "Fees disputed"
        );

        Ok(transaction)
    }
}
