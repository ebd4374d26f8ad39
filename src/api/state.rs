//! Application state for the shift marketplace API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::coordinator::{InMemoryShiftStore, OfferCoordinator};

/// Shared application state.
///
/// The coordinator is behind a single async mutex; every operation is a
/// short synchronous read-modify-write, so per-shift locking has not
/// been worth its complexity at this deployment size.
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<Mutex<OfferCoordinator<InMemoryShiftStore>>>,
}

impl AppState {
    /// Creates a new application state around the given coordinator.
    pub fn new(coordinator: OfferCoordinator<InMemoryShiftStore>) -> Self {
        Self {
            coordinator: Arc::new(Mutex::new(coordinator)),
        }
    }

    /// Returns the shared coordinator handle.
    pub fn coordinator(&self) -> &Arc<Mutex<OfferCoordinator<InMemoryShiftStore>>> {
        &self.coordinator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
