//! Application state for the leave engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::LeaveEngine;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Contains the engine instance shared across all request handlers. The
/// API shim runs over the in-memory store; a host application embedding
/// the engine against its own backend calls the engine directly instead.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<LeaveEngine<MemoryStore>>,
}

impl AppState {
    /// Creates a new application state around the given engine.
    pub fn new(engine: LeaveEngine<MemoryStore>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &LeaveEngine<MemoryStore> {
        &self.engine
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
