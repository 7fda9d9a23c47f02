use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;

/// Shared application state handed to every handler.
///
/// The pool is the single storage handle for the process; services receive it
/// as an explicit argument rather than reaching for a global.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
