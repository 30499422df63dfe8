// src/state.rs

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::session::FormSessions;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: FormSessions,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: AppConfig) -> Self {
        let sessions = FormSessions::new(config.session_idle);
        Self {
            db_pool,
            config: Arc::new(config),
            sessions,
        }
    }
}
