use rusqlite::types::Value;
use rusqlite::Row;

use crate::domain::{Entry, NewEntry};
use crate::errors::{FeedgrepError, FeedgrepResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::{EntryQuery, EntryRepository, InsertOutcome};

const ENTRY_COLUMNS: &str =
    "id, title, link, description, pub_date, guid, category, source_name, created_at";

pub struct SqliteEntryRepository {
    storage: SqliteStorage,
}

impl SqliteEntryRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn map_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
        Ok(Entry {
            id: row.get(0)?,
            title: row.get(1)?,
            link: row.get(2)?,
            description: row.get(3)?,
            published_at: row.get(4)?,
            guid: row.get(5)?,
            category: row.get(6)?,
            source_name: row.get(7)?,
            ingested_at: row.get(8)?,
        })
    }

    /// Append the keyword predicate as LIKE clauses, mirroring the pure
    /// predicate: optional terms OR-grouped, required terms ANDed, excluded
    /// terms NOT LIKE on both fields. SQLite LIKE is case-insensitive for
    /// ASCII, which is the containment contract here.
    fn push_keyword_sql(
        keyword: &crate::query::KeywordQuery,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) {
        if !keyword.optional.is_empty() {
            let group: Vec<&str> = keyword
                .optional
                .iter()
                .map(|_| "(title LIKE ? OR description LIKE ?)")
                .collect();
            sql.push_str(&format!(" AND ({})", group.join(" OR ")));
            for term in &keyword.optional {
                let pattern = format!("%{}%", term);
                params.push(Value::from(pattern.clone()));
                params.push(Value::from(pattern));
            }
        }

        for term in &keyword.required {
            sql.push_str(" AND (title LIKE ? OR description LIKE ?)");
            let pattern = format!("%{}%", term);
            params.push(Value::from(pattern.clone()));
            params.push(Value::from(pattern));
        }

        for term in &keyword.excluded {
            sql.push_str(" AND (title NOT LIKE ? AND description NOT LIKE ?)");
            let pattern = format!("%{}%", term);
            params.push(Value::from(pattern.clone()));
            params.push(Value::from(pattern));
        }
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn exists(&self, guid: &str, link: &str) -> FeedgrepResult<bool> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT EXISTS(SELECT 1 FROM feedgrep_items WHERE guid = ?1 OR link = ?2)",
        )?;
        let exists: bool = stmt.query_row([guid, link], |row| row.get(0))?;
        Ok(exists)
    }

    fn insert(&self, entry: &NewEntry) -> FeedgrepResult<InsertOutcome> {
        let conn = self.storage.connection()?;

        // The UNIQUE constraints on guid and link make this race-safe: of two
        // concurrent insertions with the same identity, exactly one row lands.
        let result = conn.execute(
            "INSERT INTO feedgrep_items (title, link, description, pub_date, guid, category, source_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &entry.title,
                &entry.link,
                &entry.description,
                &entry.published_at,
                &entry.guid,
                &entry.category,
                &entry.source_name,
            ),
        );

        match result {
            Ok(_) => {
                let id = conn.last_insert_rowid();
                let stored = conn.query_row(
                    &format!("SELECT {} FROM feedgrep_items WHERE id = ?1", ENTRY_COLUMNS),
                    [id],
                    Self::map_entry,
                )?;
                Ok(InsertOutcome::Inserted(stored))
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(FeedgrepError::from(e)),
        }
    }

    fn search(&self, query: &EntryQuery) -> FeedgrepResult<Vec<Entry>> {
        let mut sql = format!("SELECT {} FROM feedgrep_items WHERE 1=1", ENTRY_COLUMNS);
        let mut params: Vec<Value> = Vec::new();

        if let Some(category) = &query.category {
            sql.push_str(" AND category = ?");
            params.push(Value::from(category.clone()));
        }

        if let Some(source_name) = &query.source_name {
            sql.push_str(" AND source_name = ?");
            params.push(Value::from(source_name.clone()));
        }

        if let Some(keyword) = &query.keyword {
            Self::push_keyword_sql(keyword, &mut sql, &mut params);
        }

        if let Some(window) = &query.ingested_within {
            sql.push_str(" AND created_at >= datetime('now', ?)");
            params.push(Value::from(format!("-{} seconds", window.as_secs())));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Value::from(i64::from(query.clamped_limit())));
        params.push(Value::from(i64::from(query.offset)));

        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(rusqlite::params_from_iter(params), Self::map_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn count(&self) -> FeedgrepResult<u64> {
        let conn = self.storage.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM feedgrep_items", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
