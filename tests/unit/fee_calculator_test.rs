use proptest::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use marketfee::core::{AppError, Currency};
use marketfee::fees::models::{
    FeeRule, FeeStatus, FeeStructure, FeeType, ProjectType, UserTier,
};
use marketfee::fees::{FeeCalculationInput, FeeCalculator, FeeSchedule};

/// Property-based tests for fee calculation
///
/// Validates:
/// - net_amount = total_amount - sum(fees)
/// - breakdown percentage matches total fees over project value
/// - clamped rules stay inside their bounds
/// - basic tier referral commission is 2% of the project value

fn input(project_value: Decimal, user_tier: UserTier) -> FeeCalculationInput {
    FeeCalculationInput {
        project_value,
        project_type: ProjectType::Fixed,
        user_tier,
        user_id: "user-1".to_string(),
        project_id: "project-1".to_string(),
        currency: Currency::USD,
    }
}

fn bounded_calculator() -> FeeCalculator {
    let structure = FeeStructure {
        id: "bounded".to_string(),
        name: "Bounded Fees".to_string(),
        is_active: true,
        user_tiers: vec![UserTier::Premium],
        rules: vec![
            FeeRule::percentage("platform", FeeType::PlatformFee, dec!(3.5))
                .with_min(dec!(5))
                .with_max(dec!(250)),
            FeeRule::fixed("processing", FeeType::ProcessingFee, dec!(0.30)),
        ],
        commissions: vec![],
    };
    FeeCalculator::new(FeeSchedule::new(vec![structure]).unwrap())
}

fn cents(value: u64) -> Decimal {
    Decimal::from_u64(value).unwrap() / Decimal::from(100)
}

#[cfg(test)]
mod fee_calculator_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_net_amount_equals_value_minus_fees(
            value_cents in 1u64..100_000_000u64,  // $0.01 to $1,000,000
        ) {
            let value = cents(value_cents);
            let result = FeeCalculator::default()
                .calculate(&input(value, UserTier::Basic))
                .unwrap();

            prop_assert_eq!(result.total_amount, value);
            prop_assert_eq!(result.net_amount, value - result.total_fees());
            prop_assert_eq!(result.breakdown.net_amount, result.net_amount);
            prop_assert_eq!(result.breakdown.total_fees(), result.total_fees());
        }

        #[test]
        fn test_full_decimal_range_never_panics(
            mantissa in 1i128..=79_228_162_514_264_337_593_543_950_335i128,
            scale in 0u32..=4u32,
        ) {
            let value = Decimal::from_i128_with_scale(mantissa, scale);

            let basic = FeeCalculator::default()
                .calculate(&input(value, UserTier::Basic))
                .unwrap();
            prop_assert_eq!(basic.net_amount, value - basic.total_fees());
            prop_assert!(basic.commissions[0].amount <= value);

            let premium = bounded_calculator()
                .calculate(&input(value, UserTier::Premium))
                .unwrap();
            prop_assert!(premium.fees[0].amount <= dec!(250));
        }

        #[test]
        fn test_fee_percentage_matches_fees(
            value_cents in 100u64..100_000_000u64,
        ) {
            let value = cents(value_cents);
            let result = bounded_calculator()
                .calculate(&input(value, UserTier::Premium))
                .unwrap();

            let expected = result.total_fees() / value * Decimal::ONE_HUNDRED;
            prop_assert!(
                (result.breakdown.fee_percentage - expected).abs() < dec!(0.01),
                "fee_percentage {} should match {}",
                result.breakdown.fee_percentage,
                expected
            );
        }

        #[test]
        fn test_clamped_fee_stays_in_bounds(
            value_cents in 1u64..100_000_000u64,
        ) {
            let result = bounded_calculator()
                .calculate(&input(cents(value_cents), UserTier::Premium))
                .unwrap();

            let platform = &result.fees[0];
            prop_assert_eq!(platform.fee_type, FeeType::PlatformFee);
            prop_assert!(platform.amount >= dec!(5));
            prop_assert!(platform.amount <= dec!(250));
            prop_assert_eq!(result.fees[1].amount, dec!(0.30));
        }

        #[test]
        fn test_basic_referral_commission_is_two_percent(
            value_cents in 1u64..100_000_000u64,
        ) {
            let value = cents(value_cents);
            let result = FeeCalculator::default()
                .calculate(&input(value, UserTier::Basic))
                .unwrap();

            prop_assert_eq!(result.commissions.len(), 1);
            let commission = &result.commissions[0];
            let expected = (value * dec!(0.02))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(commission.amount, expected);
            prop_assert_eq!(commission.status, FeeStatus::Pending);
            prop_assert_eq!(commission.is_payable(), commission.amount >= dec!(50));
        }

        #[test]
        fn test_non_positive_values_rejected(
            value_cents in 0u64..100_000_000u64,
        ) {
            let value = -cents(value_cents);
            let result = FeeCalculator::default().calculate(&input(value, UserTier::Basic));
            prop_assert!(matches!(result, Err(AppError::InvalidValue(_))));
        }
    }

    #[test]
    fn test_worked_example() {
        let result = FeeCalculator::default()
            .calculate(&input(dec!(1000), UserTier::Basic))
            .unwrap();

        assert_eq!(result.fees.len(), 1);
        assert_eq!(result.fees[0].amount, dec!(50));
        assert_eq!(result.fees[0].name, "PLATFORM FEE");
        assert_eq!(result.fees[0].percentage, Some(dec!(5.0)));
        assert_eq!(result.net_amount, dec!(950));
        assert_eq!(result.breakdown.platform_fees, dec!(50));
        assert_eq!(result.breakdown.service_fees, Decimal::ZERO);
        assert_eq!(result.breakdown.processing_fees, Decimal::ZERO);
        assert_eq!(result.breakdown.fee_percentage, dec!(5));
        assert_eq!(result.commissions[0].amount, dec!(20));
        assert_eq!(result.commissions[0].recipient.id, "platform");
        assert!(!result.commissions[0].is_payable());
    }

    #[test]
    fn test_min_clamp_on_small_project() {
        let result = bounded_calculator()
            .calculate(&input(dec!(10), UserTier::Premium))
            .unwrap();

        // 3.5% of 10 is 0.35, raised to the minimum
        assert_eq!(result.fees[0].amount, dec!(5));
        assert_eq!(result.total_fees(), dec!(5.30));
        assert_eq!(result.net_amount, dec!(4.70));
    }

    #[test]
    fn test_fees_may_exceed_project_value() {
        let result = bounded_calculator()
            .calculate(&input(dec!(1), UserTier::Premium))
            .unwrap();

        assert_eq!(result.total_fees(), dec!(5.30));
        assert_eq!(result.net_amount, dec!(-4.30));
    }

    #[test]
    fn test_unknown_tier_has_no_structure() {
        let err = FeeCalculator::default()
            .calculate(&input(dec!(100), UserTier::Vip))
            .unwrap_err();

        assert!(matches!(err, AppError::NoMatchingStructure(UserTier::Vip)));
    }

    #[test]
    fn test_zero_value_rejected() {
        let err = FeeCalculator::default()
            .calculate(&input(Decimal::ZERO, UserTier::Basic))
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_schedule_covers_every_tier() {
        let yaml = std::fs::read_to_string("config/fee_schedule.yaml").unwrap();
        let calculator = FeeCalculator::new(FeeSchedule::from_yaml_str(&yaml).unwrap());

        for tier in [
            UserTier::Basic,
            UserTier::Premium,
            UserTier::Enterprise,
            UserTier::Vip,
        ] {
            let result = calculator.calculate(&input(dec!(10000), tier)).unwrap();
            assert_eq!(result.net_amount, dec!(10000) - result.total_fees());
        }

        // 2.5% platform + 1% service, no clamps hit at 10,000
        let enterprise = calculator
            .calculate(&input(dec!(10000), UserTier::Enterprise))
            .unwrap();
        assert_eq!(enterprise.breakdown.platform_fees, dec!(250));
        assert_eq!(enterprise.breakdown.service_fees, dec!(100));
        assert_eq!(enterprise.commissions[0].amount, dec!(100));
        assert!(enterprise.commissions[0].is_payable());
    }
}
