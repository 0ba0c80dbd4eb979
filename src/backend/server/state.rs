/**
 * Application State
 *
 * `AppState` is built once in `init` and cloned into every handler. Each
 * field is cheap to clone. Handlers that need a single piece extract it
 * directly through the `FromRef` impls below, e.g. `State<Arc<Hub>>`.
 *
 * - `config` - the loaded `AppConfig`
 * - `db_pool` - PostgreSQL pool, `None` when no database is configured
 * - `store` - the message store (PostgreSQL or in-memory)
 * - `social` - the photo, comment and like store
 * - `hub` - the realtime fan-out hub
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::messaging::store::MessageStore;
use crate::backend::realtime::Hub;
use crate::backend::social::store::SocialStore;
use crate::shared::config::AppConfig;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,

    /// Optional; auth endpoints answer 503 without it
    pub db_pool: Option<PgPool>,

    pub store: Arc<dyn MessageStore>,

    pub social: Arc<dyn SocialStore>,

    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        db_pool: Option<PgPool>,
        store: Arc<dyn MessageStore>,
        social: Arc<dyn SocialStore>,
    ) -> Self {
        let hub = Arc::new(Hub::new(store.clone(), &config));
        Self {
            config: Arc::new(config),
            db_pool,
            store,
            social,
            hub,
        }
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn MessageStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SocialStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.social.clone()
    }
}

impl FromRef<AppState> for Arc<Hub> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
