//! Configuration types for fee schedules.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Fee schedule for shift postings.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftFees {
    /// Platform commission as a fraction of base pay (observed: 0.12).
    pub service_fee_rate: Decimal,
}

/// Fee schedule for permanent-job postings.
///
/// Job postings use a flat-fee-plus-percentage structure, distinct from
/// the shift service fee.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPostingFees {
    /// Flat listing fee charged per posting.
    pub listing_fee: Decimal,
    /// Fraction of the role's weekly cost charged on top (observed: 0.05).
    pub weekly_rate: Decimal,
}

/// The complete fee schedule loaded from YAML configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeSchedule {
    /// Shift posting fees.
    pub shift: ShiftFees,
    /// Job posting fees.
    pub job_posting: JobPostingFees,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_fee_schedule_deserializes_from_yaml() {
        let yaml = r#"
shift:
  service_fee_rate: "0.12"
job_posting:
  listing_fee: "49.00"
  weekly_rate: "0.05"
"#;
        let fees: FeeSchedule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(fees.shift.service_fee_rate, Decimal::from_str("0.12").unwrap());
        assert_eq!(fees.job_posting.listing_fee, Decimal::from_str("49.00").unwrap());
        assert_eq!(fees.job_posting.weekly_rate, Decimal::from_str("0.05").unwrap());
    }
}
