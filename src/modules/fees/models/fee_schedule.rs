use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::fee_structure::{
    CalculationMethod, CommissionRule, CommissionType, FeeRule, FeeStructure, FeeType,
    PaymentMethod, PayoutFrequency, RecipientKind, RecipientTemplate, UserTier,
};
use crate::core::{AppError, Result};

/// Validated rule table handed to the fee calculator
///
/// At most one active structure may claim a given tier, so lookups never
/// depend on the order structures are listed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeSchedule {
    structures: Vec<FeeStructure>,
}

#[derive(Deserialize)]
struct FeeScheduleFile {
    structures: Vec<FeeStructure>,
}

impl FeeSchedule {
    pub fn new(structures: Vec<FeeStructure>) -> Result<Self> {
        let schedule = Self { structures };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Parse a schedule from YAML with a top-level `structures` list
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: FeeScheduleFile = serde_yaml::from_str(yaml)?;
        Self::new(file.structures)
    }

    pub fn structures(&self) -> &[FeeStructure] {
        &self.structures
    }

    /// The active structure for a tier, if any
    pub fn structure_for(&self, tier: UserTier) -> Option<&FeeStructure> {
        self.structures.iter().find(|s| s.applies_to(tier))
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        let mut claimed: HashMap<UserTier, &str> = HashMap::new();

        for structure in &self.structures {
            if !ids.insert(structure.id.as_str()) {
                return Err(AppError::configuration(format!(
                    "Duplicate fee structure id '{}'",
                    structure.id
                )));
            }

            if structure.user_tiers.is_empty() {
                return Err(AppError::configuration(format!(
                    "Fee structure '{}' applies to no user tiers",
                    structure.id
                )));
            }

            if structure.is_active {
                for tier in &structure.user_tiers {
                    if let Some(other) = claimed.insert(*tier, structure.id.as_str()) {
                        return Err(AppError::configuration(format!(
                            "User tier '{}' is claimed by active structures '{}' and '{}'",
                            tier, other, structure.id
                        )));
                    }
                }
            }

            for rule in &structure.rules {
                validate_rule(&structure.id, rule)?;
            }
            for commission in &structure.commissions {
                validate_commission(&structure.id, commission)?;
            }
        }

        Ok(())
    }
}

fn validate_rule(structure_id: &str, rule: &FeeRule) -> Result<()> {
    let fail = |reason: &str| {
        Err(AppError::configuration(format!(
            "Rule '{}' in structure '{}': {}",
            rule.id, structure_id, reason
        )))
    };

    if rule.value < Decimal::ZERO {
        return fail("value cannot be negative");
    }
    if rule.calculation_method == CalculationMethod::Percentage
        && rule.value > Decimal::ONE_HUNDRED
    {
        return fail("percentage cannot exceed 100");
    }
    if rule.min_amount.is_some_and(|min| min < Decimal::ZERO)
        || rule.max_amount.is_some_and(|max| max < Decimal::ZERO)
    {
        return fail("clamp bounds cannot be negative");
    }
    if let (Some(min), Some(max)) = (rule.min_amount, rule.max_amount) {
        if min > max {
            return fail("min_amount cannot exceed max_amount");
        }
    }

    Ok(())
}

fn validate_commission(structure_id: &str, rule: &CommissionRule) -> Result<()> {
    if rule.percentage <= Decimal::ZERO || rule.percentage > Decimal::ONE_HUNDRED {
        return Err(AppError::configuration(format!(
            "Commission '{}' in structure '{}': percentage must be within (0, 100]",
            rule.id, structure_id
        )));
    }
    if rule.recipient.minimum_amount < Decimal::ZERO {
        return Err(AppError::configuration(format!(
            "Commission '{}' in structure '{}': minimum payout cannot be negative",
            rule.id, structure_id
        )));
    }
    Ok(())
}

impl Default for FeeSchedule {
    /// Built-in table: basic users pay a 5% platform fee and generate a 2%
    /// referral commission for the platform
    fn default() -> Self {
        Self {
            structures: vec![FeeStructure {
                id: "basic_structure".to_string(),
                name: "Basic Fees".to_string(),
                is_active: true,
                user_tiers: vec![UserTier::Basic],
                rules: vec![FeeRule::percentage(
                    "basic_platform_fee",
                    FeeType::PlatformFee,
                    Decimal::new(5, 0),
                )],
                commissions: vec![CommissionRule {
                    id: "basic_platform_referral".to_string(),
                    commission_type: CommissionType::Referral,
                    percentage: Decimal::new(2, 0),
                    description: "Platform referral commission".to_string(),
                    recipient: RecipientTemplate {
                        id: "platform".to_string(),
                        name: "Platform".to_string(),
                        kind: RecipientKind::User,
                        payment_method: PaymentMethod::BankTransfer,
                        frequency: PayoutFrequency::Monthly,
                        minimum_amount: Decimal::new(50, 0),
                    },
                    is_active: true,
                }],
            }],
        }
    }
}
