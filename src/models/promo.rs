//! Promo code model and registry.
//!
//! A promo code is consumed at most once. Redemption is explicit: an
//! unknown, already-used, or wrong-kind code fails with
//! [`PromoCodeInvalid`](crate::error::EngineError::PromoCodeInvalid)
//! rather than silently not applying.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};

/// What a promo code waives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// Waives the platform service fee on one shift posting.
    FreeShiftPosting,
    /// Waives the entire charge on one job posting. A job-posting
    /// charge is all fee, so the whole transaction total is zeroed.
    FreeJobPosting,
}

impl PromoKind {
    /// The snake_case label used in error messages, matching the wire form.
    pub fn label(self) -> &'static str {
        match self {
            PromoKind::FreeShiftPosting => "free_shift_posting",
            PromoKind::FreeJobPosting => "free_job_posting",
        }
    }
}

/// A single-use promotional code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    /// The code string as entered by the venue.
    pub code: String,
    /// What this code waives.
    pub kind: PromoKind,
    /// Human-readable description.
    pub description: String,
    /// Whether the code has been consumed.
    pub used: bool,
}

/// Registry of promo codes, enforcing single use.
#[derive(Debug, Clone, Default)]
pub struct PromoRegistry {
    codes: HashMap<String, PromoCode>,
}

impl PromoRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a code. Replaces any existing code with the same string.
    pub fn register(&mut self, code: &str, kind: PromoKind, description: &str) {
        self.codes.insert(
            code.to_string(),
            PromoCode {
                code: code.to_string(),
                kind,
                description: description.to_string(),
                used: false,
            },
        );
    }

    /// Redeems a code, marking it used.
    ///
    /// Fails with `PromoCodeInvalid` if the code is unknown or already
    /// used. Returns the consumed code so the caller can apply the
    /// kind-directed discount.
    pub fn redeem(&mut self, code: &str) -> EngineResult<PromoCode> {
        let entry = self
            .codes
            .get_mut(code)
            .ok_or_else(|| EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "unknown code".to_string(),
            })?;
        if entry.used {
            return Err(EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "already used".to_string(),
            });
        }
        entry.used = true;
        Ok(entry.clone())
    }

    /// Redeems a code, additionally requiring it to be of the given kind.
    ///
    /// A code of the wrong kind fails with `PromoCodeInvalid` and is not
    /// consumed.
    pub fn redeem_for(&mut self, code: &str, kind: PromoKind) -> EngineResult<PromoCode> {
        let entry = self
            .codes
            .get(code)
            .ok_or_else(|| EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: "unknown code".to_string(),
            })?;
        if entry.kind != kind {
            return Err(EngineError::PromoCodeInvalid {
                code: code.to_string(),
                reason: format!("code is for {}, not {}", entry.kind.label(), kind.label()),
            });
        }
        self.redeem(code)
    }

    /// Looks up a code without consuming it.
    pub fn get(&self, code: &str) -> Option<&PromoCode> {
        self.codes.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_freejob() -> PromoRegistry {
        let mut registry = PromoRegistry::new();
        registry.register("FREEJOB", PromoKind::FreeJobPosting, "One free job posting");
        registry
    }

    #[test]
    fn test_redeem_marks_code_used() {
        let mut registry = registry_with_freejob();
        let code = registry.redeem("FREEJOB").unwrap();
        assert_eq!(code.kind, PromoKind::FreeJobPosting);
        assert!(registry.get("FREEJOB").unwrap().used);
    }

    #[test]
    fn test_redeem_unknown_code_fails() {
        let mut registry = registry_with_freejob();
        let result = registry.redeem("NOSUCHCODE");
        match result.unwrap_err() {
            EngineError::PromoCodeInvalid { code, reason } => {
                assert_eq!(code, "NOSUCHCODE");
                assert_eq!(reason, "unknown code");
            }
            other => panic!("Expected PromoCodeInvalid, got {:?}", other),
        }
    }

    /// Scenario: reapplying a consumed code fails rather than no-oping.
    #[test]
    fn test_redeem_twice_fails() {
        let mut registry = registry_with_freejob();
        registry.redeem("FREEJOB").unwrap();
        let result = registry.redeem("FREEJOB");
        match result.unwrap_err() {
            EngineError::PromoCodeInvalid { code, reason } => {
                assert_eq!(code, "FREEJOB");
                assert_eq!(reason, "already used");
            }
            other => panic!("Expected PromoCodeInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_redeem_for_wrong_kind_fails_without_consuming() {
        let mut registry = registry_with_freejob();
        let result = registry.redeem_for("FREEJOB", PromoKind::FreeShiftPosting);
        assert!(result.is_err());
        // The code must remain redeemable for its actual kind.
        assert!(!registry.get("FREEJOB").unwrap().used);
        assert!(registry.redeem_for("FREEJOB", PromoKind::FreeJobPosting).is_ok());
    }
}
