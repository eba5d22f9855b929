//! # Application State
//!
//! Shared state for the Axum application. There is no database pool yet —
//! corridors and entities live in an in-memory map behind a `RwLock`, which
//! is enough to exercise the domain crates end to end over HTTP. A real
//! deployment would replace these maps with a `sqlx::PgPool`-backed store
//! without changing the handler signatures.

use std::collections::HashMap;
use std::sync::Arc;

use msez_core::{CorridorId, EntityId};
use msez_state::corridor::DynCorridor;
use msez_state::entity::Entity;
use tokio::sync::RwLock;

pub type CorridorStore = Arc<RwLock<HashMap<CorridorId, DynCorridor>>>;
pub type EntityStore = Arc<RwLock<HashMap<EntityId, Entity>>>;

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub corridors: CorridorStore,
    pub entities: EntityStore,
}

impl AppState {
    /// Create a new, empty application state.
    pub fn new() -> Self {
        Self {
            corridors: Arc::new(RwLock::new(HashMap::new())),
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
