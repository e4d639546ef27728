use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::core::{AppError, Result};
use crate::modules::fees::models::{
    CalculatedCommission, CalculatedFee, CalculationMethod, CommissionRecipient, CommissionRule,
    FeeBreakdown, FeeCalculationInput, FeeCalculationResult, FeeRule, FeeSchedule, FeeStatus,
    FeeStructure, FeeType, PaymentPreferences, UserTier,
};

/// Days until a derived commission falls due
pub const COMMISSION_DUE_DAYS: i64 = 30;

/// Maps calculation requests to fee and commission breakdowns
///
/// Holds nothing but the injected schedule, so one instance can be shared
/// across workers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub fn structures(&self) -> &[FeeStructure] {
        self.schedule.structures()
    }

    /// Active structure for a tier
    pub fn structure_for_tier(&self, tier: UserTier) -> Result<&FeeStructure> {
        self.schedule
            .structure_for(tier)
            .ok_or(AppError::NoMatchingStructure(tier))
    }

    pub fn calculate(&self, input: &FeeCalculationInput) -> Result<FeeCalculationResult> {
        self.calculate_at(input, Utc::now())
    }

    /// Calculate fees as of `now`
    ///
    /// # Errors
    /// * `InvalidValue` if the project value is not strictly positive, or so
    ///   large that fees or commissions leave the decimal range
    /// * `NoMatchingStructure` if no active structure covers the user tier
    pub fn calculate_at(
        &self,
        input: &FeeCalculationInput,
        now: DateTime<Utc>,
    ) -> Result<FeeCalculationResult> {
        if input.project_value <= Decimal::ZERO {
            warn!(
                project_id = %input.project_id,
                project_value = %input.project_value,
                "Rejected fee calculation for non-positive project value"
            );
            return Err(AppError::invalid_value("Project value must be positive"));
        }

        let structure = self.structure_for_tier(input.user_tier)?;

        let fees = structure
            .rules
            .iter()
            .filter(|rule| rule.is_active)
            .map(|rule| evaluate_rule(rule, input))
            .collect::<Result<Vec<CalculatedFee>>>()?;

        let commissions = structure
            .commissions
            .iter()
            .filter(|rule| rule.is_active)
            .map(|rule| derive_commission(rule, input, now))
            .collect::<Result<Vec<CalculatedCommission>>>()?;

        let total_fees = checked_sum(fees.iter().map(|f| f.amount))?;
        checked_sum(commissions.iter().map(|c| c.amount))?;
        let net_amount = input
            .project_value
            .checked_sub(total_fees)
            .ok_or_else(too_large)?;
        let fee_percentage = total_fees
            .checked_div(input.project_value)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(too_large)?;

        let breakdown = FeeBreakdown {
            gross_amount: input.project_value,
            platform_fees: sum_of_type(&fees, FeeType::PlatformFee)?,
            service_fees: sum_of_type(&fees, FeeType::ServiceFee)?,
            processing_fees: sum_of_type(&fees, FeeType::ProcessingFee)?,
            net_amount,
            fee_percentage,
        };

        debug!(
            project_id = %input.project_id,
            structure = %structure.id,
            fee_count = fees.len(),
            commission_count = commissions.len(),
            total_fees = %total_fees,
            "Fees calculated"
        );

        Ok(FeeCalculationResult {
            input: input.clone(),
            total_amount: input.project_value,
            net_amount,
            fees,
            commissions,
            breakdown,
            calculated_at: now,
        })
    }
}

fn too_large() -> AppError {
    AppError::invalid_value("Project value too large")
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(too_large)
}

fn evaluate_rule(rule: &FeeRule, input: &FeeCalculationInput) -> Result<CalculatedFee> {
    let percentage = match rule.calculation_method {
        CalculationMethod::Percentage => Some(rule.value),
        CalculationMethod::Fixed => None,
    };
    let amount = rule
        .raw_amount(input.project_value)
        .ok_or_else(too_large)?;

    Ok(CalculatedFee {
        fee_type: rule.fee_type,
        name: rule.fee_type.display_name(),
        description: format!("{} fee", rule.calculation_method),
        amount: input.currency.round(amount),
        percentage,
        rule: rule.clone(),
        applied: true,
    })
}

fn derive_commission(
    rule: &CommissionRule,
    input: &FeeCalculationInput,
    now: DateTime<Utc>,
) -> Result<CalculatedCommission> {
    let amount = rule
        .percentage
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|share| input.project_value.checked_mul(share))
        .ok_or_else(too_large)?;
    let due_date = now
        .checked_add_signed(Duration::days(COMMISSION_DUE_DAYS))
        .ok_or_else(|| AppError::invalid_value("Commission due date out of range"))?;

    Ok(CalculatedCommission {
        commission_type: rule.commission_type,
        recipient: CommissionRecipient {
            id: rule.recipient.id.clone(),
            name: rule.recipient.name.clone(),
            kind: rule.recipient.kind,
            payment_preferences: PaymentPreferences {
                method: rule.recipient.payment_method,
                currency: input.currency,
                frequency: rule.recipient.frequency,
                minimum_amount: rule.recipient.minimum_amount,
            },
        },
        amount: input.currency.round(amount),
        percentage: rule.percentage,
        description: rule.description.clone(),
        status: FeeStatus::Pending,
        due_date,
    })
}

// Same-type fees are summed so the named fields always add up to total fees
fn sum_of_type(fees: &[CalculatedFee], fee_type: FeeType) -> Result<Decimal> {
    checked_sum(
        fees.iter()
            .filter(|f| f.fee_type == fee_type)
            .map(|f| f.amount),
    )
}
