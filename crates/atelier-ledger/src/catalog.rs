//! Catalog lifecycle: creation, price updates, tombstoning, reads.

use atelier_db::queries;
use atelier_types::{unix_now, AccountId, Content, ContentId};
use rusqlite::Connection;

use crate::{ContentLedger, LedgerError, Result};

impl ContentLedger {
    /// Create a content item. Allocates the next id from the strictly
    /// increasing counter and counts the creation, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidInput`] on empty creator id, empty title
    ///   or content reference, or zero price
    pub fn create_content(
        &self,
        creator_id: &AccountId,
        title: &str,
        content_ref: &str,
        price: u64,
    ) -> Result<ContentId> {
        self.db
            .with_tx(|tx| create_content_tx(tx, creator_id, title, content_ref, price, unix_now()))
    }

    /// Overwrite the price of an active item. Past revenue records keep
    /// the price they were purchased at.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the content is unknown or inactive
    /// - [`LedgerError::Forbidden`] if the caller is not the owner
    /// - [`LedgerError::InvalidInput`] if the new price is zero
    pub fn update_price(
        &self,
        caller: &AccountId,
        content_id: ContentId,
        new_price: u64,
    ) -> Result<()> {
        self.db.with_tx(|tx| {
            let row = require_active(tx, content_id)?;
            if row.creator_id != caller.as_str() {
                return Err(LedgerError::Forbidden(content_id));
            }
            if new_price == 0 {
                return Err(LedgerError::InvalidInput("price must be positive".into()));
            }
            queries::content::set_price(tx, content_id, new_price)?;
            tracing::info!(content_id, new_price, "content price updated");
            Ok(())
        })
    }

    /// Tombstone a content item. Irreversible; existing access grants
    /// survive.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the content is unknown or inactive
    /// - [`LedgerError::Forbidden`] if the caller is not the owner
    pub fn deactivate(&self, caller: &AccountId, content_id: ContentId) -> Result<()> {
        self.db.with_tx(|tx| {
            let row = require_active(tx, content_id)?;
            if row.creator_id != caller.as_str() {
                return Err(LedgerError::Forbidden(content_id));
            }
            queries::content::deactivate(tx, content_id)?;
            tracing::info!(content_id, "content tombstoned");
            Ok(())
        })
    }

    /// Fetch an active content item.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the content is unknown or inactive
    pub fn get_content(&self, content_id: ContentId) -> Result<Content> {
        self.db.with_conn(|conn| {
            let row = require_active(conn, content_id)?;
            Ok(Content {
                content_id: row.content_id,
                creator_id: AccountId::from(row.creator_id),
                title: row.title,
                content_ref: row.content_ref,
                price: row.price,
                created_at: row.created_at,
                active: row.active,
            })
        })
    }

    /// Every id the creator has published, in creation order, including
    /// tombstoned items.
    pub fn creator_content(&self, creator_id: &AccountId) -> Result<Vec<ContentId>> {
        self.db
            .with_conn(|conn| Ok(queries::content::ids_by_creator(conn, creator_id.as_str())?))
    }
}

/// Transaction-composable form of [`ContentLedger::create_content`].
pub fn create_content_tx(
    conn: &Connection,
    creator_id: &AccountId,
    title: &str,
    content_ref: &str,
    price: u64,
    now: u64,
) -> Result<ContentId> {
    if creator_id.is_empty() {
        return Err(LedgerError::InvalidInput("creator id must be non-empty".into()));
    }
    if title.is_empty() {
        return Err(LedgerError::InvalidInput("title must be non-empty".into()));
    }
    if content_ref.is_empty() {
        return Err(LedgerError::InvalidInput(
            "content reference must be non-empty".into(),
        ));
    }
    if price == 0 {
        return Err(LedgerError::InvalidInput("price must be positive".into()));
    }

    let content_id = queries::totals::allocate_content_id(conn)?;
    queries::content::insert(conn, content_id, creator_id.as_str(), title, content_ref, price, now)?;

    tracing::info!(content_id, creator = %creator_id, price, "content published");
    Ok(content_id)
}

/// Fetch a content row, gating on the active flag.
fn require_active(
    conn: &Connection,
    content_id: ContentId,
) -> Result<queries::content::ContentRow> {
    match queries::content::get(conn, content_id)? {
        Some(row) if row.active => Ok(row),
        _ => Err(LedgerError::NotFound(content_id)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atelier_db::Db;
    use atelier_payments::MemoryEscrow;

    use super::*;

    fn test_ledger() -> ContentLedger {
        ContentLedger::new(
            Db::open_memory().expect("open test db"),
            Arc::new(MemoryEscrow::new()),
        )
    }

    #[test]
    fn test_create_and_get() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");

        let id = ledger
            .create_content(&alice, "Tutorial", "ref1", 100)
            .expect("create");
        assert_eq!(id, 1);

        let content = ledger.get_content(id).expect("get");
        assert_eq!(content.creator_id, alice);
        assert_eq!(content.title, "Tutorial");
        assert_eq!(content.content_ref, "ref1");
        assert_eq!(content.price, 100);
        assert!(content.active);
    }

    #[test]
    fn test_ids_strictly_increase_across_creators() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");
        let bob = AccountId::from("bob");

        assert_eq!(ledger.create_content(&alice, "A", "r1", 100).expect("create"), 1);
        assert_eq!(ledger.create_content(&bob, "B", "r2", 100).expect("create"), 2);
        assert_eq!(ledger.create_content(&alice, "C", "r3", 100).expect("create"), 3);
    }

    #[test]
    fn test_id_never_reused_after_deactivation() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");

        let first = ledger.create_content(&alice, "A", "r1", 100).expect("create");
        ledger.deactivate(&alice, first).expect("deactivate");

        let second = ledger.create_content(&alice, "B", "r2", 100).expect("create");
        assert_eq!(second, first + 1, "id 1 is never reused");
    }

    #[test]
    fn test_create_validation() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");

        for (creator, title, content_ref, price) in [
            (AccountId::from(""), "T", "r", 100u64),
            (alice.clone(), "", "r", 100),
            (alice.clone(), "T", "", 100),
            (alice.clone(), "T", "r", 0),
        ] {
            let result = ledger.create_content(&creator, title, content_ref, price);
            assert!(matches!(result, Err(LedgerError::InvalidInput(_))));
        }

        // A failed creation must not consume an id.
        let id = ledger.create_content(&alice, "T", "r", 100).expect("create");
        assert_eq!(id, 1);
    }

    #[test]
    fn test_update_price() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");
        let id = ledger.create_content(&alice, "T", "r", 100).expect("create");

        ledger.update_price(&alice, id, 250).expect("update");
        assert_eq!(ledger.get_content(id).expect("get").price, 250);

        let result = ledger.update_price(&AccountId::from("mallory"), id, 1);
        assert!(matches!(result, Err(LedgerError::Forbidden(_))));

        let result = ledger.update_price(&alice, id, 0);
        assert!(matches!(result, Err(LedgerError::InvalidInput(_))));

        let result = ledger.update_price(&alice, 99, 250);
        assert!(matches!(result, Err(LedgerError::NotFound(99))));
    }

    #[test]
    fn test_deactivate_gates_reads_and_mutation() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");
        let id = ledger.create_content(&alice, "T", "r", 100).expect("create");

        let result = ledger.deactivate(&AccountId::from("mallory"), id);
        assert!(matches!(result, Err(LedgerError::Forbidden(_))));

        ledger.deactivate(&alice, id).expect("deactivate");

        assert!(matches!(ledger.get_content(id), Err(LedgerError::NotFound(_))));
        assert!(matches!(
            ledger.update_price(&alice, id, 250),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            ledger.deactivate(&alice, id),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_creator_content_index() {
        let ledger = test_ledger();
        let alice = AccountId::from("alice");
        let bob = AccountId::from("bob");

        let a1 = ledger.create_content(&alice, "A", "r1", 100).expect("create");
        ledger.create_content(&bob, "B", "r2", 100).expect("create");
        let a2 = ledger.create_content(&alice, "C", "r3", 100).expect("create");
        ledger.deactivate(&alice, a1).expect("deactivate");

        assert_eq!(ledger.creator_content(&alice).expect("index"), vec![a1, a2]);
        assert!(ledger
            .creator_content(&AccountId::from("nobody"))
            .expect("index")
            .is_empty());
    }
}
