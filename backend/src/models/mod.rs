use sqlx::SqlitePool;

use crate::config::Config;

pub mod achievement;

pub use achievement::*;

/// Application state shared across all handlers
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
}
