//! Storage abstractions for cursor state persistence.
//!
//! The state file is read once at the start of a run and written back
//! exactly once after a selection succeeds. Loading never fails: a missing,
//! unreadable or corrupt file yields the initial state together with the
//! reason, so callers can log the recovery.

pub mod local;

use std::fmt;

use crate::error::Result;
use crate::models::CursorState;

// Re-export for convenience
pub use local::{LocalStateStore, StagedWrite};

/// Why the initial state was substituted for the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recovery {
    /// No state file yet (first run)
    Missing,
    /// The file exists but could not be read
    Unreadable(String),
    /// The file was read but is not a valid state document
    Corrupt(String),
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recovery::Missing => write!(f, "no state file"),
            Recovery::Unreadable(e) => write!(f, "state file unreadable: {e}"),
            Recovery::Corrupt(e) => write!(f, "state file corrupt: {e}"),
        }
    }
}

/// Outcome of loading the cursor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateLoad {
    Loaded(CursorState),
    Recovered {
        state: CursorState,
        reason: Recovery,
    },
}

impl StateLoad {
    pub fn recovered(reason: Recovery) -> Self {
        Self::Recovered {
            state: CursorState::default(),
            reason,
        }
    }

    pub fn state(&self) -> &CursorState {
        match self {
            Self::Loaded(state) | Self::Recovered { state, .. } => state,
        }
    }

    pub fn into_state(self) -> CursorState {
        match self {
            Self::Loaded(state) | Self::Recovered { state, .. } => state,
        }
    }
}

/// Trait for cursor state backends.
pub trait StateStore: Send + Sync {
    /// Load the stored state, substituting the initial state on any failure.
    fn load(&self) -> StateLoad;

    /// Replace the stored state atomically.
    fn save(&self, state: &CursorState) -> Result<()>;
}
