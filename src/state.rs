use std::sync::Arc;

use crate::auth::{AuthorizationGuard, TokenService};
use crate::database::{Database, PgProfileStore, ProfileStore};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub guard: AuthorizationGuard,
}

impl AppState {
    /// Wire the guard to the Postgres profile store over the same pool
    pub fn new(db: Database, tokens: TokenService, enforce_faculty_gate: bool) -> Self {
        let store: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(db.pool().clone()));
        Self::with_store(db, tokens, store, enforce_faculty_gate)
    }

    pub fn with_store(
        db: Database,
        tokens: TokenService,
        store: Arc<dyn ProfileStore>,
        enforce_faculty_gate: bool,
    ) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            guard: AuthorizationGuard::new(store, enforce_faculty_gate),
        }
    }
}
