//! SQLite storage, reader side.
//!
//! The update service owns the schema; this side only makes sure the table
//! exists so queries against a fresh database fail soft instead of hard.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, Connection};

use stripdex_core::{Comic, Error, Result};

use crate::service::Storage;

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(db_err)?;
        ensure_table(&conn).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        ensure_table(&conn).map_err(db_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Test helper to seed the store directly.
    #[cfg(test)]
    pub(crate) fn insert(&self, comic: &Comic) {
        let words = serde_json::to_string(&comic.words).unwrap();
        self.conn
            .lock()
            .execute(
                "INSERT INTO comics (id, url, words) VALUES (?1, ?2, ?3)",
                params![comic.id, comic.url, words],
            )
            .unwrap();
    }
}

fn ensure_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS comics (
            id INTEGER PRIMARY KEY,
            url TEXT NOT NULL,
            words TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn db_err(err: rusqlite::Error) -> Error {
    Error::Internal(anyhow::anyhow!("database error: {err}"))
}

fn row_to_comic(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn parse_words(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|err| Error::Internal(anyhow::anyhow!("corrupt words column: {err}")))
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn search(&self, keyword: &str) -> Result<Vec<i64>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT c.id FROM comics c, json_each(c.words) j
                 WHERE j.value = ?1 ORDER BY c.id",
            )
            .map_err(db_err)?;
        let ids = stmt
            .query_map(params![keyword], |row| row.get(0))
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<i64>>>()
            .map_err(db_err)?;
        Ok(ids)
    }

    async fn get(&self, id: i64) -> Result<Comic> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, url FROM comics WHERE id = ?1",
            params![id],
            |row| {
                Ok(Comic {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    words: Vec::new(),
                })
            },
        )
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            other => db_err(other),
        })
    }

    async fn get_all(&self) -> Result<Vec<Comic>> {
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn
                .prepare("SELECT id, url, words FROM comics")
                .map_err(db_err)?;
            let rows = stmt
                .query_map([], row_to_comic)
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(db_err)?;
            rows
        };

        rows.into_iter()
            .map(|(id, url, words)| {
                Ok(Comic {
                    id,
                    url,
                    words: parse_words(&words)?,
                })
            })
            .collect()
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Comic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let query = format!("SELECT id, url, words FROM comics WHERE id IN ({placeholders})");

        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&query).map_err(db_err)?;
            let rows = stmt
                .query_map(params_from_iter(ids.iter()), row_to_comic)
                .map_err(db_err)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(db_err)?;
            rows
        };

        rows.into_iter()
            .map(|(id, url, words)| {
                Ok(Comic {
                    id,
                    url,
                    words: parse_words(&words)?,
                })
            })
            .collect()
    }
}
