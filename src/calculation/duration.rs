//! Billable hours calculation.
//!
//! Converts a start time, end time, and unpaid-break length into billable
//! hours, handling overnight spans and 15-minute-increment validation.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Minutes in a full day, used for the overnight wrap.
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Computes the billable hours for a shift.
///
/// Both clock times must sit on a 15-minute boundary (minute component in
/// {0, 15, 30, 45}, zero seconds); anything else fails with
/// `InvalidTimeGranularity`.
///
/// If `end <= start`, the shift is treated as crossing midnight and 24
/// hours are added to the duration before the break deduction. This lets
/// a posting form collect only two clock times and infer overnight shifts
/// automatically; the trade-off is that a shift legitimately longer than
/// 24 hours cannot be expressed through this model.
///
/// A break longer than the shift clamps the result to zero rather than
/// producing negative pay.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
/// use shiftmatch_engine::calculation::billable_hours;
///
/// let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
/// let hours = billable_hours(start, end, 30).unwrap();
/// assert_eq!(hours, Decimal::new(75, 1)); // 7.5
/// ```
pub fn billable_hours(start: NaiveTime, end: NaiveTime, break_minutes: u32) -> EngineResult<Decimal> {
    validate_granularity("start", start)?;
    validate_granularity("end", end)?;

    let gross_minutes = gross_minutes(start, end);
    let worked_minutes = (gross_minutes - i64::from(break_minutes)).max(0);

    Ok(Decimal::new(worked_minutes, 0) / Decimal::new(60, 0))
}

/// Resolves a posting form's date and two clock times into UTC instants.
///
/// Applies the same overnight-wrap rule as [`billable_hours`]: an end
/// time at or before the start time lands on the following day. Both
/// times are validated for 15-minute granularity.
pub fn resolve_instants(
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> EngineResult<(DateTime<Utc>, DateTime<Utc>)> {
    validate_granularity("start", start)?;
    validate_granularity("end", end)?;

    let start_instant = date.and_time(start).and_utc();
    let end_date = if end <= start {
        date + Duration::days(1)
    } else {
        date
    };
    let end_instant = end_date.and_time(end).and_utc();

    Ok((start_instant, end_instant))
}

/// Gross shift length in minutes, after the overnight wrap.
fn gross_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let raw = (end - start).num_minutes();
    if raw <= 0 { raw + MINUTES_PER_DAY } else { raw }
}

fn validate_granularity(field: &str, time: NaiveTime) -> EngineResult<()> {
    use chrono::Timelike;
    if time.minute() % 15 != 0 || time.second() != 0 || time.nanosecond() != 0 {
        return Err(EngineError::InvalidTimeGranularity {
            field: field.to_string(),
            value: time,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    /// DC-001: 09:00-17:00 with 30min break is 7.5 hours
    #[test]
    fn test_day_shift_with_break() {
        assert_eq!(billable_hours(time(9, 0), time(17, 0), 30).unwrap(), dec("7.5"));
    }

    /// DC-002: 22:00-06:00 overnight with no break is 8.0 hours
    #[test]
    fn test_overnight_shift() {
        assert_eq!(billable_hours(time(22, 0), time(6, 0), 0).unwrap(), dec("8.0"));
    }

    /// DC-003: equal start and end wraps to a full 24-hour shift
    #[test]
    fn test_equal_times_wrap_to_full_day() {
        assert_eq!(billable_hours(time(9, 0), time(9, 0), 0).unwrap(), dec("24"));
    }

    /// DC-004: break longer than the shift clamps to zero
    #[test]
    fn test_break_longer_than_shift_clamps_to_zero() {
        assert_eq!(billable_hours(time(9, 0), time(9, 15), 60).unwrap(), dec("0"));
    }

    /// DC-005: off-grid minute fails with InvalidTimeGranularity
    #[test]
    fn test_invalid_minute_granularity() {
        let result = billable_hours(time(9, 10), time(17, 0), 0);
        match result.unwrap_err() {
            EngineError::InvalidTimeGranularity { field, value } => {
                assert_eq!(field, "start");
                assert_eq!(value, time(9, 10));
            }
            other => panic!("Expected InvalidTimeGranularity, got {:?}", other),
        }
    }

    /// DC-006: nonzero seconds fail even on a 15-minute boundary
    #[test]
    fn test_nonzero_seconds_rejected() {
        let end = NaiveTime::from_hms_opt(17, 0, 30).unwrap();
        let result = billable_hours(time(9, 0), end, 0);
        match result.unwrap_err() {
            EngineError::InvalidTimeGranularity { field, .. } => assert_eq!(field, "end"),
            other => panic!("Expected InvalidTimeGranularity, got {:?}", other),
        }
    }

    #[test]
    fn test_quarter_hour_boundaries_accepted() {
        for minute in [0, 15, 30, 45] {
            assert!(billable_hours(time(9, minute), time(17, 0), 0).is_ok());
        }
    }

    #[test]
    fn test_resolve_instants_same_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (start, end) = resolve_instants(date, time(9, 0), time(17, 0)).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-02T09:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-02T17:00:00+00:00");
    }

    #[test]
    fn test_resolve_instants_overnight_lands_on_next_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let (start, end) = resolve_instants(date, time(22, 0), time(6, 0)).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-02T22:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-03T06:00:00+00:00");
        assert!(end > start);
    }

    #[test]
    fn test_resolve_instants_rejects_off_grid_times() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(resolve_instants(date, time(9, 5), time(17, 0)).is_err());
    }

    proptest! {
        /// Billable hours are never negative for any on-grid inputs.
        #[test]
        fn prop_hours_never_negative(
            start_q in 0u32..96,
            end_q in 0u32..96,
            break_minutes in 0u32..2000,
        ) {
            let start = NaiveTime::from_hms_opt(start_q / 4, (start_q % 4) * 15, 0).unwrap();
            let end = NaiveTime::from_hms_opt(end_q / 4, (end_q % 4) * 15, 0).unwrap();
            let hours = billable_hours(start, end, break_minutes).unwrap();
            prop_assert!(hours >= Decimal::ZERO);
        }

        /// Without the overnight wrap, hours equal (end - start - break) / 60.
        #[test]
        fn prop_same_day_hours_match_formula(
            start_q in 0u32..95,
            len_q in 1u32..96,
        ) {
            prop_assume!(start_q + len_q < 96);
            let start = NaiveTime::from_hms_opt(start_q / 4, (start_q % 4) * 15, 0).unwrap();
            let end_q = start_q + len_q;
            let end = NaiveTime::from_hms_opt(end_q / 4, (end_q % 4) * 15, 0).unwrap();
            let hours = billable_hours(start, end, 0).unwrap();
            prop_assert_eq!(hours, Decimal::new(i64::from(len_q) * 15, 0) / Decimal::new(60, 0));
        }

        /// Overnight inputs yield ((24h - start) + end) / 60 before the break.
        #[test]
        fn prop_overnight_hours_match_formula(
            start_q in 1u32..96,
            end_q in 0u32..96,
        ) {
            prop_assume!(end_q <= start_q);
            let start = NaiveTime::from_hms_opt(start_q / 4, (start_q % 4) * 15, 0).unwrap();
            let end = NaiveTime::from_hms_opt(end_q / 4, (end_q % 4) * 15, 0).unwrap();
            let hours = billable_hours(start, end, 0).unwrap();
            let expected_minutes = i64::from(96 - start_q + end_q) * 15;
            prop_assert_eq!(hours, Decimal::new(expected_minutes, 0) / Decimal::new(60, 0));
        }
    }
}
