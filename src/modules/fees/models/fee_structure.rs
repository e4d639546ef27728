use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership tier of the user being charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTier {
    Basic,
    Premium,
    Enterprise,
    Vip,
}

impl UserTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserTier::Basic => "basic",
            UserTier::Premium => "premium",
            UserTier::Enterprise => "enterprise",
            UserTier::Vip => "vip",
        }
    }
}

impl fmt::Display for UserTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(UserTier::Basic),
            "premium" => Ok(UserTier::Premium),
            "enterprise" => Ok(UserTier::Enterprise),
            "vip" => Ok(UserTier::Vip),
            _ => Err(format!("Invalid user tier: {}", s)),
        }
    }
}

/// How the project is billed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    Fixed,
    Hourly,
    Milestone,
    Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    PlatformFee,
    ServiceFee,
    ProcessingFee,
}

impl FeeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::PlatformFee => "platform_fee",
            FeeType::ServiceFee => "service_fee",
            FeeType::ProcessingFee => "processing_fee",
        }
    }

    /// Label shown on statements, e.g. "PLATFORM FEE"
    pub fn display_name(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// `value` is in percentage points of the project value
    Percentage,
    /// `value` is a currency amount
    Fixed,
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationMethod::Percentage => f.write_str("percentage"),
            CalculationMethod::Fixed => f.write_str("fixed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    Referral,
    Partner,
    Affiliate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    User,
    Partner,
    Affiliate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Paypal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutFrequency {
    Weekly,
    Monthly,
}

/// A single configured fee line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRule {
    pub id: String,
    pub fee_type: FeeType,
    pub calculation_method: CalculationMethod,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl FeeRule {
    pub fn percentage(id: impl Into<String>, fee_type: FeeType, value: Decimal) -> Self {
        Self {
            id: id.into(),
            fee_type,
            calculation_method: CalculationMethod::Percentage,
            value,
            min_amount: None,
            max_amount: None,
            is_active: true,
        }
    }

    pub fn fixed(id: impl Into<String>, fee_type: FeeType, value: Decimal) -> Self {
        Self {
            calculation_method: CalculationMethod::Fixed,
            ..Self::percentage(id, fee_type, value)
        }
    }

    pub fn with_min(mut self, min_amount: Decimal) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max(mut self, max_amount: Decimal) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Unrounded amount for a project value, after clamping
    ///
    /// `None` when the amount does not fit the decimal range.
    pub fn raw_amount(&self, project_value: Decimal) -> Option<Decimal> {
        let mut amount = match self.calculation_method {
            CalculationMethod::Percentage => {
                project_value.checked_mul(self.value.checked_div(Decimal::ONE_HUNDRED)?)?
            }
            CalculationMethod::Fixed => self.value,
        };

        if let Some(min) = self.min_amount {
            if amount < min {
                amount = min;
            }
        }
        if let Some(max) = self.max_amount {
            if amount > max {
                amount = max;
            }
        }

        Some(amount)
    }
}

/// Template for whoever receives a commission payout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientTemplate {
    pub id: String,
    pub name: String,
    pub kind: RecipientKind,
    pub payment_method: PaymentMethod,
    pub frequency: PayoutFrequency,
    /// Smallest balance that gets paid out
    pub minimum_amount: Decimal,
}

/// Commission derived alongside the fees of a structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRule {
    pub id: String,
    pub commission_type: CommissionType,
    /// Percentage points of the project value
    pub percentage: Decimal,
    pub description: String,
    pub recipient: RecipientTemplate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A set of fee and commission rules applied to one or more user tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub user_tiers: Vec<UserTier>,
    pub rules: Vec<FeeRule>,
    #[serde(default)]
    pub commissions: Vec<CommissionRule>,
}

impl FeeStructure {
    pub fn applies_to(&self, tier: UserTier) -> bool {
        self.is_active && self.user_tiers.contains(&tier)
    }
}

fn default_active() -> bool {
    true
}
