//! Access grant query functions.

use atelier_types::ContentId;
use rusqlite::{Connection, OptionalExtension};

use crate::Result;

/// Insert an access grant recording the price at purchase time.
pub fn insert(
    conn: &Connection,
    content_id: ContentId,
    buyer_id: &str,
    price_paid: u64,
    granted_at: u64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO access_grants (content_id, buyer_id, granted_at, price_paid)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![content_id, buyer_id, granted_at as i64, price_paid as i64],
    )?;
    Ok(())
}

/// Fetch a grant for (content, buyer).
pub fn get(
    conn: &Connection,
    content_id: ContentId,
    buyer_id: &str,
) -> Result<Option<GrantRow>> {
    let row = conn
        .query_row(
            "SELECT content_id, buyer_id, granted_at, price_paid
             FROM access_grants WHERE content_id = ?1 AND buyer_id = ?2",
            rusqlite::params![content_id, buyer_id],
            |row| {
                Ok(GrantRow {
                    content_id: row.get(0)?,
                    buyer_id: row.get(1)?,
                    granted_at: row.get::<_, i64>(2)? as u64,
                    price_paid: row.get::<_, i64>(3)? as u64,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Check whether a grant exists for (content, buyer).
pub fn exists(conn: &Connection, content_id: ContentId, buyer_id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM access_grants WHERE content_id = ?1 AND buyer_id = ?2",
        rusqlite::params![content_id, buyer_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Number of completed purchases for a content item.
pub fn count_for_content(conn: &Connection, content_id: ContentId) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM access_grants WHERE content_id = ?1",
        [content_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// All-time revenue of a content item, as recorded at each purchase.
pub fn revenue_for_content(conn: &Connection, content_id: ContentId) -> Result<u64> {
    let sum: i64 = conn.query_row(
        "SELECT COALESCE(SUM(price_paid), 0) FROM access_grants WHERE content_id = ?1",
        [content_id],
        |row| row.get(0),
    )?;
    Ok(sum as u64)
}

/// A raw access grant row.
#[derive(Debug)]
pub struct GrantRow {
    pub content_id: ContentId,
    pub buyer_id: String,
    pub granted_at: u64,
    pub price_paid: u64,
}
