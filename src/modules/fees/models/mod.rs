pub mod calculation;
pub mod fee_schedule;
pub mod fee_structure;

pub use calculation::{
    CalculatedCommission, CalculatedFee, CommissionRecipient, FeeBreakdown,
    FeeCalculationInput, FeeCalculationResult, FeeStatus, PaymentPreferences,
};
pub use fee_schedule::FeeSchedule;
pub use fee_structure::{
    CalculationMethod, CommissionRule, CommissionType, FeeRule, FeeStructure, FeeType,
    PaymentMethod, PayoutFrequency, ProjectType, RecipientKind, RecipientTemplate, UserTier,
};
