//! Ledger totals query functions.
//!
//! The singleton totals row is maintained incrementally inside the same
//! transaction as the record writes it counts, so the stored aggregates
//! always equal [`recompute`]'s re-derivation from the record set.

use atelier_types::{ContentId, PlatformStats};
use rusqlite::Connection;

use crate::Result;

/// Read the stored aggregates.
pub fn get(conn: &Connection) -> Result<PlatformStats> {
    let stats = conn.query_row(
        "SELECT total_creators, total_content_created, total_revenue
         FROM ledger_totals WHERE id = 1",
        [],
        |row| {
            Ok(PlatformStats {
                total_creators: row.get::<_, i64>(0)? as u64,
                total_content_created: row.get::<_, i64>(1)? as u64,
                total_revenue: row.get::<_, i64>(2)? as u64,
            })
        },
    )?;
    Ok(stats)
}

/// Count a newly registered creator.
pub fn increment_creators(conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE ledger_totals SET total_creators = total_creators + 1 WHERE id = 1",
        [],
    )?;
    Ok(())
}

/// Allocate the next content id and count the creation.
///
/// Allocation and the created-count move together: a content row exists
/// for every allocated id, so ids are gap-free and never reused.
pub fn allocate_content_id(conn: &Connection) -> Result<ContentId> {
    let id: ContentId = conn.query_row(
        "SELECT next_content_id FROM ledger_totals WHERE id = 1",
        [],
        |row| row.get(0),
    )?;
    conn.execute(
        "UPDATE ledger_totals
         SET next_content_id = next_content_id + 1,
             total_content_created = total_content_created + 1
         WHERE id = 1",
        [],
    )?;
    Ok(id)
}

/// Add a completed purchase's price to the revenue total.
pub fn add_revenue(conn: &Connection, amount: u64) -> Result<()> {
    conn.execute(
        "UPDATE ledger_totals SET total_revenue = total_revenue + ?1 WHERE id = 1",
        [amount as i64],
    )?;
    Ok(())
}

/// Re-derive the aggregates from the full record set.
pub fn recompute(conn: &Connection) -> Result<PlatformStats> {
    let stats = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM creators),
                (SELECT COUNT(*) FROM content),
                (SELECT COALESCE(SUM(price_paid), 0) FROM access_grants)",
        [],
        |row| {
            Ok(PlatformStats {
                total_creators: row.get::<_, i64>(0)? as u64,
                total_content_created: row.get::<_, i64>(1)? as u64,
                total_revenue: row.get::<_, i64>(2)? as u64,
            })
        },
    )?;
    Ok(stats)
}
