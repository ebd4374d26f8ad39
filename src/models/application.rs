//! Application model.
//!
//! An application is a worker's expression of interest in an open shift.
//! Applications are superseded, never deleted, when a shift is filled by
//! another worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a worker's application to a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting a venue decision.
    Pending,
    /// The venue extended an offer to this applicant.
    Offered,
    /// The applicant accepted the offer and was assigned.
    Accepted,
    /// Superseded or declined; no longer actionable.
    Rejected,
}

/// A worker's expression of interest in an open shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// The shift applied to.
    pub shift_id: String,
    /// The applying worker.
    pub worker_id: String,
    /// Current status of this application.
    pub status: ApplicationStatus,
    /// When the worker applied.
    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// Creates a pending application for the given shift and worker.
    pub fn new(shift_id: &str, worker_id: &str, applied_at: DateTime<Utc>) -> Self {
        Self {
            shift_id: shift_id.to_string(),
            worker_id: worker_id.to_string(),
            status: ApplicationStatus::Pending,
            applied_at,
        }
    }

    /// Returns true if this application can still lead to an assignment.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Pending | ApplicationStatus::Offered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_is_pending() {
        let app = Application::new("shift_001", "worker_001", Utc::now());
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(app.is_actionable());
    }

    #[test]
    fn test_rejected_application_is_not_actionable() {
        let mut app = Application::new("shift_001", "worker_001", Utc::now());
        app.status = ApplicationStatus::Rejected;
        assert!(!app.is_actionable());
    }

    #[test]
    fn test_accepted_application_is_not_actionable() {
        let mut app = Application::new("shift_001", "worker_001", Utc::now());
        app.status = ApplicationStatus::Accepted;
        assert!(!app.is_actionable());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ApplicationStatus::Offered).unwrap();
        assert_eq!(json, "\"offered\"");
    }
}
