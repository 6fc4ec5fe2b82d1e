use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{FeedgrepError, FeedgrepResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feedgrep_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL DEFAULT '',
    link TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    pub_date TEXT NOT NULL DEFAULT '',
    guid TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL DEFAULT '',
    source_name TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_items_category ON feedgrep_items(category);
CREATE INDEX IF NOT EXISTS idx_items_source_name ON feedgrep_items(source_name);
CREATE INDEX IF NOT EXISTS idx_items_created_at ON feedgrep_items(created_at);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> FeedgrepResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> FeedgrepResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, FeedgrepError> {
        self.conn
            .lock()
            .map_err(|_| FeedgrepError::Database(rusqlite::Error::InvalidQuery))
    }
}
