use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::AppResult;

pub mod migrations;
pub mod repositories;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the planner's SQLite file. Cheap to clone; every call opens its
/// own connection so blocking store work can run on any worker thread.
#[derive(Clone, Debug)]
pub struct DbPool {
    path: PathBuf,
}

impl DbPool {
    /// Creates the parent directory if needed, then applies the schema and
    /// pending migrations once.
    pub fn new<P: Into<PathBuf>>(path: P) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let pool = Self { path };
        let conn = pool.open()?;
        conn.execute_batch(SCHEMA_SQL)?;
        migrations::run(&conn)?;
        info!(target: "app::db", db_path = %pool.path.display(), "plan store ready");

        Ok(pool)
    }

    pub fn with_connection<F, T>(&self, callback: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let conn = self.open()?;
        callback(&conn)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", 1)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        debug!(target: "app::db", db_path = %self.path.display(), "connection opened");
        Ok(conn)
    }
}
