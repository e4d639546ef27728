use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fee_structure::{
    CommissionType, FeeRule, FeeType, PaymentMethod, PayoutFrequency, ProjectType,
    RecipientKind, UserTier,
};
use crate::core::Currency;

/// Input to a fee calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeCalculationInput {
    pub project_value: Decimal,
    pub project_type: ProjectType,
    pub user_tier: UserTier,
    pub user_id: String,
    pub project_id: String,
    #[serde(default)]
    pub currency: Currency,
}

/// Commission payout status, also used for fee application state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Applied,
    Refunded,
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "pending"),
            FeeStatus::Applied => write!(f, "applied"),
            FeeStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// One fee rule evaluated against a project value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedFee {
    pub fee_type: FeeType,
    pub name: String,
    pub description: String,
    /// Rounded to cents
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
    pub rule: FeeRule,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPreferences {
    pub method: PaymentMethod,
    pub currency: Currency,
    pub frequency: PayoutFrequency,
    pub minimum_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecipient {
    pub id: String,
    pub name: String,
    pub kind: RecipientKind,
    pub payment_preferences: PaymentPreferences,
}

/// A payable owed to a third party as a consequence of the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedCommission {
    pub commission_type: CommissionType,
    pub recipient: CommissionRecipient,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub description: String,
    pub status: FeeStatus,
    pub due_date: DateTime<Utc>,
}

impl CalculatedCommission {
    /// Whether the amount reaches the recipient's payout threshold
    pub fn is_payable(&self) -> bool {
        self.amount >= self.recipient.payment_preferences.minimum_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub gross_amount: Decimal,
    pub platform_fees: Decimal,
    pub service_fees: Decimal,
    pub processing_fees: Decimal,
    pub net_amount: Decimal,
    pub fee_percentage: Decimal,
}

impl FeeBreakdown {
    pub fn total_fees(&self) -> Decimal {
        self.platform_fees + self.service_fees + self.processing_fees
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeCalculationResult {
    pub input: FeeCalculationInput,
    pub total_amount: Decimal,
    pub net_amount: Decimal,
    pub fees: Vec<CalculatedFee>,
    pub commissions: Vec<CalculatedCommission>,
    pub breakdown: FeeBreakdown,
    pub calculated_at: DateTime<Utc>,
}

impl FeeCalculationResult {
    pub fn total_fees(&self) -> Decimal {
        self.fees.iter().map(|f| f.amount).sum()
    }

    pub fn total_commissions(&self) -> Decimal {
        self.commissions.iter().map(|c| c.amount).sum()
    }
}
