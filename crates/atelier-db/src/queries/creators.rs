//! Creator registry query functions.

use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Insert a creator record. Active from birth.
pub fn insert(
    conn: &Connection,
    account_id: &str,
    username: &str,
    bio: &str,
    created_at: u64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO creators (account_id, username, bio, created_at, active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        rusqlite::params![account_id, username, bio, created_at as i64],
    )?;
    Ok(())
}

/// Check whether an active creator record exists for the account.
pub fn exists(conn: &Connection, account_id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM creators WHERE account_id = ?1 AND active = 1",
        [account_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Fetch a creator record.
pub fn get(conn: &Connection, account_id: &str) -> Result<Option<CreatorRow>> {
    let row = conn
        .query_row(
            "SELECT account_id, username, bio, created_at, active
             FROM creators WHERE account_id = ?1",
            [account_id],
            |row| {
                Ok(CreatorRow {
                    account_id: row.get(0)?,
                    username: row.get(1)?,
                    bio: row.get(2)?,
                    created_at: row.get::<_, i64>(3)? as u64,
                    active: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Overwrite username and bio in place. Identity and created_at are
/// untouched.
pub fn update_profile(
    conn: &Connection,
    account_id: &str,
    username: &str,
    bio: &str,
) -> Result<usize> {
    let updated = conn.execute(
        "UPDATE creators SET username = ?1, bio = ?2 WHERE account_id = ?3 AND active = 1",
        rusqlite::params![username, bio, account_id],
    )?;
    Ok(updated)
}

/// Count all creator records (for aggregate re-derivation).
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM creators", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// A raw creator row.
#[derive(Debug)]
pub struct CreatorRow {
    pub account_id: String,
    pub username: String,
    pub bio: String,
    pub created_at: u64,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open test db");
        conn.execute_batch("PRAGMA foreign_keys = ON;").expect("pragma");
        crate::migrations::run(&conn).expect("migrate");
        conn
    }

    #[test]
    fn test_insert_and_get() {
        let conn = test_conn();
        insert(&conn, "alice", "Alice", "Fashion creator", 1000).expect("insert");

        let row = get(&conn, "alice").expect("get").expect("row present");
        assert_eq!(row.username, "Alice");
        assert_eq!(row.bio, "Fashion creator");
        assert_eq!(row.created_at, 1000);
        assert!(row.active);
    }

    #[test]
    fn test_exists() {
        let conn = test_conn();
        assert!(!exists(&conn, "alice").expect("exists"));
        insert(&conn, "alice", "Alice", "", 1000).expect("insert");
        assert!(exists(&conn, "alice").expect("exists"));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let conn = test_conn();
        insert(&conn, "alice", "Alice", "", 1000).expect("first insert");
        let result = insert(&conn, "alice", "Alice2", "", 2000);
        assert!(result.is_err(), "primary key forbids a second record");
    }

    #[test]
    fn test_update_profile() {
        let conn = test_conn();
        insert(&conn, "alice", "Alice", "old bio", 1000).expect("insert");

        let updated = update_profile(&conn, "alice", "Alice B", "new bio").expect("update");
        assert_eq!(updated, 1);

        let row = get(&conn, "alice").expect("get").expect("row");
        assert_eq!(row.username, "Alice B");
        assert_eq!(row.bio, "new bio");
        assert_eq!(row.created_at, 1000, "created_at untouched");
    }

    #[test]
    fn test_update_unknown_touches_nothing() {
        let conn = test_conn();
        let updated = update_profile(&conn, "ghost", "G", "").expect("update");
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_count() {
        let conn = test_conn();
        assert_eq!(count(&conn).expect("count"), 0);
        insert(&conn, "a", "A", "", 1).expect("insert");
        insert(&conn, "b", "B", "", 2).expect("insert");
        assert_eq!(count(&conn).expect("count"), 2);
    }
}
