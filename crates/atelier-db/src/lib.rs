//! # atelier-db
//!
//! Transactional store for the Atelier marketplace. Manages the single
//! SQLite database holding creators, the content catalog, access grants,
//! and the ledger totals row.
//!
//! ## Guarantees
//!
//! - WAL mode, foreign keys enforced
//! - All timestamps are Unix epoch seconds (u64)
//! - Schema version stored in `PRAGMA user_version`
//! - Every mutating marketplace operation runs through [`Db::with_tx`]:
//!   one IMMEDIATE transaction behind one mutex, giving whole-operation
//!   atomicity and a single global order of state changes

pub mod migrations;
pub mod queries;
pub mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Shared handle to the marketplace database.
///
/// Cheap to clone; all clones serialize their access through one mutex.
/// Holding the lock for the whole read-preconditions-then-write span is
/// what makes each operation appear atomic and totally ordered to every
/// other caller.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open or create the marketplace database at the given path.
    ///
    /// Configures WAL mode, foreign keys, and runs any pending migrations.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure inside one IMMEDIATE transaction.
    ///
    /// Commits when the closure returns `Ok`; rolls back every write when
    /// it returns `Err`. Concurrent callers block on the handle mutex, so
    /// no transaction ever observes another's intermediate state.
    pub fn with_tx<T, E>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<DbError>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| E::from(DbError::Sqlite(e)))?;
        let out = f(&tx)?;
        tx.commit().map_err(|e| E::from(DbError::Sqlite(e)))?;
        Ok(out)
    }

    /// Run a read-only closure against the connection.
    pub fn with_conn<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let db = Db::open_memory().expect("open in-memory db");
        let version: u32 = db
            .with_conn(|conn| conn.pragma_query_value(None, "user_version", |row| row.get(0)))
            .map_err(DbError::Sqlite)
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Db::open_memory().expect("open");
        let fk: i32 = db
            .with_conn(|conn| conn.pragma_query_value(None, "foreign_keys", |row| row.get(0)))
            .map_err(DbError::Sqlite)
            .expect("get foreign_keys");
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_with_tx_commits() {
        let db = Db::open_memory().expect("open");
        db.with_tx::<_, DbError>(|tx| {
            tx.execute(
                "INSERT INTO creators (account_id, username, bio, created_at) VALUES ('a', 'A', '', 1)",
                [],
            )?;
            Ok(())
        })
        .expect("tx");

        let count: i64 = db
            .with_conn(|conn| conn.query_row("SELECT COUNT(*) FROM creators", [], |r| r.get(0)))
            .map_err(DbError::Sqlite)
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_with_tx_rolls_back_on_error() {
        let db = Db::open_memory().expect("open");
        let result = db.with_tx::<(), DbError>(|tx| {
            tx.execute(
                "INSERT INTO creators (account_id, username, bio, created_at) VALUES ('a', 'A', '', 1)",
                [],
            )?;
            Err(DbError::Constraint("forced failure".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|conn| conn.query_row("SELECT COUNT(*) FROM creators", [], |r| r.get(0)))
            .map_err(DbError::Sqlite)
            .expect("count");
        assert_eq!(count, 0, "rolled-back insert must not be visible");
    }
}
