//! Actor identity for lifecycle operations.
//!
//! Every lifecycle and coordinator call names the party performing it
//! explicitly; the engine never consults ambient session state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The party performing an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// A venue, identified by its venue id.
    Venue(String),
    /// A worker, identified by their worker id.
    Worker(String),
    /// The platform itself, for time-based and payout-driven transitions.
    System,
}

impl Actor {
    /// Returns true if this actor is the venue with the given id.
    pub fn is_venue(&self, venue_id: &str) -> bool {
        matches!(self, Actor::Venue(id) if id == venue_id)
    }

    /// Returns true if this actor is the worker with the given id.
    pub fn is_worker(&self, worker_id: &str) -> bool {
        matches!(self, Actor::Worker(id) if id == worker_id)
    }

    /// Returns true if this actor is the system.
    pub fn is_system(&self) -> bool {
        matches!(self, Actor::System)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Venue(id) => write!(f, "venue:{}", id),
            Actor::Worker(id) => write!(f, "worker:{}", id),
            Actor::System => write!(f, "system"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_identity_checks() {
        let venue = Actor::Venue("v1".to_string());
        assert!(venue.is_venue("v1"));
        assert!(!venue.is_venue("v2"));
        assert!(!venue.is_worker("v1"));

        let worker = Actor::Worker("w1".to_string());
        assert!(worker.is_worker("w1"));
        assert!(!worker.is_venue("w1"));

        assert!(Actor::System.is_system());
        assert!(!venue.is_system());
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(Actor::Venue("v1".to_string()).to_string(), "venue:v1");
        assert_eq!(Actor::Worker("w9".to_string()).to_string(), "worker:w9");
        assert_eq!(Actor::System.to_string(), "system");
    }

    #[test]
    fn test_actor_serialization_round_trip() {
        let actor = Actor::Worker("w1".to_string());
        let json = serde_json::to_string(&actor).unwrap();
        let back: Actor = serde_json::from_str(&json).unwrap();
        assert_eq!(actor, back);
    }
}
