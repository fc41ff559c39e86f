//! Leave-year calendar functions.
//!
//! The leave-year is a fiscal period starting at a configured calendar
//! month (April in the standard policy), identified by the calendar year it
//! starts in. All functions here are pure and total: out-of-range inputs
//! are clamped, never rejected.

use chrono::{Datelike, NaiveDate};

/// Number of months in a leave-year.
pub const MONTHS_PER_LEAVE_YEAR: u32 = 12;

/// Returns the leave-year containing `date`.
///
/// Leave-year `Y` covers `[start_month 1 of Y, start_month 1 of Y+1)`; with
/// the standard April start, April 1 `Y` through March 31 `Y+1`.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::leave_year_of;
/// use chrono::NaiveDate;
///
/// let july = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
/// assert_eq!(leave_year_of(july, 4), 2025);
///
/// let february = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
/// assert_eq!(leave_year_of(february, 4), 2025);
/// ```
pub fn leave_year_of(date: NaiveDate, start_month: u32) -> i32 {
    let start_month = start_month.clamp(1, 12);
    if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Returns the number of completed service months of `date`'s leave-year as
/// of `as_of`, in `[0, 12]`.
///
/// Within the same leave-year and an April start: if `as_of` is in April or
/// later, the index is `as_of.month - 3` (April counts as month 1); for
/// January through March it is `as_of.month + 9`. If `as_of` falls in a
/// later leave-year than `date` the index clamps to 12 (the year is over);
/// in an earlier one it clamps to 0 (the year has not started).
///
/// This mirrors how many monthly accruals should already exist.
///
/// # Examples
///
/// ```
/// use leave_engine::calculation::service_month_index;
/// use chrono::NaiveDate;
///
/// let as_of = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
/// assert_eq!(service_month_index(as_of, as_of, 4), 4);
/// ```
pub fn service_month_index(date: NaiveDate, as_of: NaiveDate, start_month: u32) -> u32 {
    let start_month = start_month.clamp(1, 12);
    let year = leave_year_of(date, start_month);
    let as_of_year = leave_year_of(as_of, start_month);

    if as_of_year > year {
        return MONTHS_PER_LEAVE_YEAR;
    }
    if as_of_year < year {
        return 0;
    }

    let month = as_of.month();
    if month >= start_month {
        month - start_month + 1
    } else {
        month + MONTHS_PER_LEAVE_YEAR - start_month + 1
    }
}

/// Returns the first and last calendar day of the given leave-year.
pub fn leave_year_bounds(year: i32, start_month: u32) -> (NaiveDate, NaiveDate) {
    let start_month = start_month.clamp(1, 12);
    // Month is clamped to a valid range, so construction cannot fail.
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).unwrap_or_default();
    let next_start = NaiveDate::from_ymd_opt(year + 1, start_month, 1).unwrap_or_default();
    let end = next_start.pred_opt().unwrap_or(next_start);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leave_year_starts_in_april() {
        assert_eq!(leave_year_of(ymd(2025, 4, 1), 4), 2025);
        assert_eq!(leave_year_of(ymd(2025, 12, 31), 4), 2025);
        assert_eq!(leave_year_of(ymd(2026, 3, 31), 4), 2025);
        assert_eq!(leave_year_of(ymd(2026, 4, 1), 4), 2026);
    }

    #[test]
    fn test_leave_year_with_january_start_is_calendar_year() {
        assert_eq!(leave_year_of(ymd(2025, 1, 1), 1), 2025);
        assert_eq!(leave_year_of(ymd(2025, 12, 31), 1), 2025);
    }

    #[test]
    fn test_index_counts_april_as_month_one() {
        let date = ymd(2025, 4, 15);
        assert_eq!(service_month_index(date, ymd(2025, 4, 30), 4), 1);
        assert_eq!(service_month_index(date, ymd(2025, 7, 31), 4), 4);
        assert_eq!(service_month_index(date, ymd(2025, 12, 1), 4), 9);
    }

    #[test]
    fn test_index_wraps_through_march() {
        let date = ymd(2025, 4, 15);
        assert_eq!(service_month_index(date, ymd(2026, 1, 15), 4), 10);
        assert_eq!(service_month_index(date, ymd(2026, 2, 15), 4), 11);
        assert_eq!(service_month_index(date, ymd(2026, 3, 15), 4), 12);
    }

    #[test]
    fn test_index_clamps_to_twelve_after_year_ends() {
        let date = ymd(2025, 4, 15);
        assert_eq!(service_month_index(date, ymd(2026, 4, 1), 4), 12);
        assert_eq!(service_month_index(date, ymd(2030, 6, 1), 4), 12);
    }

    #[test]
    fn test_index_clamps_to_zero_before_year_starts() {
        let date = ymd(2025, 4, 15);
        assert_eq!(service_month_index(date, ymd(2025, 3, 31), 4), 0);
        assert_eq!(service_month_index(date, ymd(2020, 1, 1), 4), 0);
    }

    #[test]
    fn test_bounds_of_april_start_year() {
        let (start, end) = leave_year_bounds(2025, 4);
        assert_eq!(start, ymd(2025, 4, 1));
        assert_eq!(end, ymd(2026, 3, 31));
    }

    #[test]
    fn test_out_of_range_start_month_is_clamped() {
        // 0 clamps to January, 13 clamps to December
        assert_eq!(leave_year_of(ymd(2025, 6, 1), 0), 2025);
        let (start, _) = leave_year_bounds(2025, 13);
        assert_eq!(start, ymd(2025, 12, 1));
    }

    proptest! {
        #[test]
        fn prop_index_is_always_within_range(
            y in 2000i32..2100,
            m in 1u32..=12,
            d in 1u32..=28,
            ay in 2000i32..2100,
            am in 1u32..=12,
            ad in 1u32..=28,
            start in 1u32..=12,
        ) {
            let index = service_month_index(ymd(y, m, d), ymd(ay, am, ad), start);
            prop_assert!(index <= MONTHS_PER_LEAVE_YEAR);
        }

        #[test]
        fn prop_index_is_monotone_in_as_of(
            m in 1u32..=12,
            d in 1u32..=28,
            am in 1u32..=12,
            start in 1u32..=12,
        ) {
            let date = ymd(2025, m, d);
            let earlier = ymd(2025, am, 1);
            let later = ymd(2025, am, 28);
            prop_assert!(
                service_month_index(date, earlier, start)
                    <= service_month_index(date, later, start)
            );
        }

        #[test]
        fn prop_every_date_falls_within_its_year_bounds(
            y in 2000i32..2100,
            m in 1u32..=12,
            d in 1u32..=28,
            start in 1u32..=12,
        ) {
            let date = ymd(y, m, d);
            let year = leave_year_of(date, start);
            let (lo, hi) = leave_year_bounds(year, start);
            prop_assert!(date >= lo && date <= hi);
        }
    }
}
