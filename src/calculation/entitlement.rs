//! Entitlement accrual formula.
//!
//! Entitlement is linear in completed service months and capped per
//! leave-year: `min(months * monthly_rate, annual_cap)`.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::{LeaveTypePolicy, PolicyConfig};

/// Days accrued for one leave type after `months` completed service months.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::accrued_to_date;
/// use leave_engine::config::PolicyConfig;
///
/// let config = PolicyConfig::standard();
/// let earned = config.policy("earned_annual").unwrap();
/// // 4 completed months at 1.25 days/month, under the 15-day cap
/// assert_eq!(accrued_to_date(earned, 4).to_string(), "5.00");
/// ```
pub fn accrued_to_date(policy: &LeaveTypePolicy, months: u32) -> Decimal {
    (Decimal::from(months) * policy.monthly_rate).min(policy.annual_cap)
}

/// Days credited by the accrual of service month `month` alone.
///
/// Zero for month 0 and for months past the cap.
pub fn accrued_in_month(policy: &LeaveTypePolicy, month: u32) -> Decimal {
    if month == 0 {
        return Decimal::ZERO;
    }
    accrued_to_date(policy, month) - accrued_to_date(policy, month - 1)
}

/// Accrued-to-date days for every accruing leave type, keyed by code.
pub fn accrued_by_type(config: &PolicyConfig, months: u32) -> BTreeMap<String, Decimal> {
    config
        .accruing()
        .map(|(code, policy)| (code.clone(), accrued_to_date(policy, months)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// Four completed service months: earned 5.0, sick 2.0, casual 2.0.
    #[test]
    fn test_four_months_of_standard_policy() {
        let config = PolicyConfig::standard();
        assert_eq!(
            accrued_to_date(config.policy("earned_annual").unwrap(), 4),
            dec("5.00")
        );
        assert_eq!(accrued_to_date(config.policy("sick").unwrap(), 4), dec("2.0"));
        assert_eq!(
            accrued_to_date(config.policy("casual").unwrap(), 4),
            dec("2.0")
        );
    }

    #[test]
    fn test_zero_months_accrues_nothing() {
        let config = PolicyConfig::standard();
        for (_, policy) in config.accruing() {
            assert_eq!(accrued_to_date(policy, 0), Decimal::ZERO);
        }
    }

    #[test]
    fn test_full_year_hits_the_cap() {
        let config = PolicyConfig::standard();
        assert_eq!(
            accrued_to_date(config.policy("earned_annual").unwrap(), 12),
            dec("15")
        );
        assert_eq!(accrued_to_date(config.policy("sick").unwrap(), 12), dec("6"));
    }

    #[test]
    fn test_months_past_the_cap_stay_capped() {
        let config = PolicyConfig::standard();
        let earned = config.policy("earned_annual").unwrap();
        assert_eq!(accrued_to_date(earned, 12), accrued_to_date(earned, 13));
    }

    #[test]
    fn test_monthly_delta_matches_rate_under_cap() {
        let config = PolicyConfig::standard();
        let earned = config.policy("earned_annual").unwrap();
        assert_eq!(accrued_in_month(earned, 1), dec("1.25"));
        assert_eq!(accrued_in_month(earned, 12), dec("1.25"));
        assert_eq!(accrued_in_month(earned, 0), Decimal::ZERO);
    }

    #[test]
    fn test_accrued_by_type_covers_accruing_codes_only() {
        let config = PolicyConfig::standard();
        let by_type = accrued_by_type(&config, 4);
        assert_eq!(by_type.len(), 3);
        assert_eq!(by_type["earned_annual"], dec("5.00"));
        assert!(!by_type.contains_key("unpaid"));
    }

    proptest! {
        #[test]
        fn prop_accrual_is_monotone_and_capped(months in 0u32..=24) {
            let config = PolicyConfig::standard();
            for (_, policy) in config.accruing() {
                let now = accrued_to_date(policy, months);
                let next = accrued_to_date(policy, months + 1);
                prop_assert!(now <= next);
                prop_assert!(next <= policy.annual_cap);
            }
        }

        #[test]
        fn prop_monthly_deltas_sum_to_cumulative(months in 0u32..=24) {
            let config = PolicyConfig::standard();
            for (_, policy) in config.accruing() {
                let summed: Decimal = (0..=months)
                    .map(|m| accrued_in_month(policy, m))
                    .sum();
                prop_assert_eq!(summed, accrued_to_date(policy, months));
            }
        }
    }
}
