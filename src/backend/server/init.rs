/**
 * Server Initialization
 *
 * 1. Connect the optional database
 * 2. Pick the message and social stores: PostgreSQL when connected,
 *    in-memory otherwise
 * 3. Build `AppState`, which creates the realtime hub
 * 4. Assemble the router
 *
 * The caller keeps the returned `AppState` so it can shut the hub down.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::messaging::store::MessageStore;
use crate::backend::messaging::{InMemoryMessageStore, PgMessageStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::backend::social::{InMemorySocialStore, PgSocialStore, SocialStore};
use crate::shared::config::AppConfig;

/// Build the application state from configuration
pub async fn build_state(config: AppConfig) -> AppState {
    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }

    let db_pool = load_database(&config).await;
    let (store, social): (Arc<dyn MessageStore>, Arc<dyn SocialStore>) = match &db_pool {
        Some(pool) => (
            Arc::new(PgMessageStore::new(pool.clone())),
            Arc::new(PgSocialStore::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(InMemorySocialStore::new()),
        ),
    };

    AppState::new(config, db_pool, store, social)
}

/// Build the router and the state behind it
pub async fn create_app(config: AppConfig) -> (Router, AppState) {
    tracing::info!("Initializing InstaSpace backend server");

    let state = build_state(config).await;
    let app = create_router(state.clone());

    tracing::info!("Router configured");
    (app, state)
}

/// State over a given store, with no database. Used by tests and tools.
pub fn in_memory_state(config: AppConfig, store: Arc<dyn MessageStore>) -> AppState {
    AppState::new(config, None, store, Arc::new(InMemorySocialStore::new()))
}
