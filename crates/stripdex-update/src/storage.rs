//! SQLite storage, writer side.
//!
//! The `words` column holds the keyword list as a JSON array; aggregate
//! queries use the `json_each` table-valued function. The schema is created
//! on startup and versioned through a `schema_version` table.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection};

use stripdex_core::{Comic, DbStats, Error, Result};

use crate::service::Storage;

/// Current schema version. Increment when making breaking changes.
const SCHEMA_VERSION: i32 = 1;

/// SQLite-backed comic store.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database file and run migrations.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(db_err)?;
        init_schema(&conn).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        init_schema(&conn).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    if version.unwrap_or(0) == 0 {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS comics (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                words TEXT NOT NULL
            );
            "#,
        )?;
        conn.execute("DELETE FROM schema_version", [])?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
    }

    Ok(())
}

fn db_err(err: rusqlite::Error) -> Error {
    Error::Internal(anyhow::anyhow!("database error: {err}"))
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn add(&self, comic: Comic) -> Result<()> {
        let words = serde_json::to_string(&comic.words)
            .map_err(|err| Error::Internal(anyhow::anyhow!("failed to encode words: {err}")))?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO comics (id, url, words) VALUES (?1, ?2, ?3)",
            params![comic.id, comic.url, words],
        )
        .map_err(db_err)?;
        Ok(())
    }

    async fn ids(&self) -> Result<Vec<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id FROM comics").map_err(db_err)?;
        let ids = stmt
            .query_map([], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(db_err)?;
        Ok(ids)
    }

    async fn stats(&self) -> Result<DbStats> {
        let conn = self.conn.lock();

        let comics_fetched: i64 = conn
            .query_row("SELECT COUNT(*) FROM comics", [], |row| row.get(0))
            .map_err(db_err)?;

        let words_total: i64 = conn
            .query_row(
                "SELECT COALESCE(SUM(json_array_length(words)), 0) FROM comics",
                [],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        let words_unique: i64 = conn
            .query_row(
                "SELECT COUNT(DISTINCT j.value) FROM comics, json_each(comics.words) AS j",
                [],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        Ok(DbStats {
            words_total,
            words_unique,
            comics_fetched,
        })
    }

    async fn drop_all(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM comics", []).map_err(db_err)?;
        Ok(())
    }
}
