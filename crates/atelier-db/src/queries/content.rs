//! Content catalog query functions.

use atelier_types::ContentId;
use rusqlite::{Connection, OptionalExtension};

use crate::{DbError, Result};

/// Insert a content item under a pre-allocated id. Active from birth.
pub fn insert(
    conn: &Connection,
    content_id: ContentId,
    creator_id: &str,
    title: &str,
    content_ref: &str,
    price: u64,
    created_at: u64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO content (content_id, creator_id, title, content_ref, price, created_at, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)",
        rusqlite::params![
            content_id,
            creator_id,
            title,
            content_ref,
            price as i64,
            created_at as i64,
        ],
    )?;
    Ok(())
}

/// Fetch a content row regardless of active state.
///
/// The active-gate for catalog reads lives in the ledger; the implicit
/// creator-access check needs the stored creator even for tombstoned
/// items.
pub fn get(conn: &Connection, content_id: ContentId) -> Result<Option<ContentRow>> {
    let row = conn
        .query_row(
            "SELECT content_id, creator_id, title, content_ref, price, created_at, active
             FROM content WHERE content_id = ?1",
            [content_id],
            |row| {
                Ok(ContentRow {
                    content_id: row.get(0)?,
                    creator_id: row.get(1)?,
                    title: row.get(2)?,
                    content_ref: row.get(3)?,
                    price: row.get::<_, i64>(4)? as u64,
                    created_at: row.get::<_, i64>(5)? as u64,
                    active: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Overwrite the price of an active item.
pub fn set_price(conn: &Connection, content_id: ContentId, price: u64) -> Result<()> {
    let updated = conn.execute(
        "UPDATE content SET price = ?1 WHERE content_id = ?2 AND active = 1",
        rusqlite::params![price as i64, content_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound("content not found or inactive".into()));
    }
    Ok(())
}

/// Tombstone a content item. One-way.
pub fn deactivate(conn: &Connection, content_id: ContentId) -> Result<()> {
    let updated = conn.execute(
        "UPDATE content SET active = 0 WHERE content_id = ?1 AND active = 1",
        [content_id],
    )?;
    if updated == 0 {
        return Err(DbError::NotFound("content not found or inactive".into()));
    }
    Ok(())
}

/// All ids ever created by a creator, in creation order. Deactivated
/// items stay in the index.
pub fn ids_by_creator(conn: &Connection, creator_id: &str) -> Result<Vec<ContentId>> {
    let mut stmt = conn.prepare(
        "SELECT content_id FROM content WHERE creator_id = ?1 ORDER BY content_id",
    )?;
    let ids = stmt
        .query_map([creator_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Count all content records (for aggregate re-derivation).
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM content", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// A raw content row.
#[derive(Debug)]
pub struct ContentRow {
    pub content_id: ContentId,
    pub creator_id: String,
    pub title: String,
    pub content_ref: String,
    pub price: u64,
    pub created_at: u64,
    pub active: bool,
}
