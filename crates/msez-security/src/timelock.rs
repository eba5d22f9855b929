//! # Front-Running Prevention via Time-Locked Actions
//!
//! Sensitive actions (e.g. a watcher bond withdrawal) are queued with a
//! mandatory delay before they can execute, so an observer cannot front
//! run them by racing a competing transaction into the same block.
//!
//! Grounded on `original_source/tools/phoenix/security.py`'s
//! "Front-Running Prevention - time-locked withdrawals" primitive.

use msez_core::Timestamp;

use crate::error::SecurityError;

#[derive(Debug, Clone)]
pub struct TimeLockedAction {
    pub action_id: String,
    pub unlock_at: Timestamp,
    executed: bool,
}

impl TimeLockedAction {
    pub fn new(action_id: impl Into<String>, unlock_at: Timestamp) -> Self {
        Self {
            action_id: action_id.into(),
            unlock_at,
            executed: false,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    /// Attempt to execute. Fails if the lock has not yet elapsed, or if
    /// the action was already executed once.
    pub fn try_execute(&mut self, now: Timestamp) -> Result<(), SecurityError> {
        if self.executed {
            return Err(SecurityError::AlreadyExecuted {
                action_id: self.action_id.clone(),
            });
        }
        if now < self.unlock_at {
            return Err(SecurityError::StillLocked {
                action_id: self.action_id.clone(),
                unlock_at: self.unlock_at.to_iso8601(),
            });
        }
        self.executed = true;
        Ok(())
    }
}
