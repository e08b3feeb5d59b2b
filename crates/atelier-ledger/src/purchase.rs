//! Purchases, access checks, and earnings reads.

use atelier_db::queries;
use atelier_types::{unix_now, AccessGrant, AccountId, ContentId};

use crate::{ContentLedger, LedgerError, Result};

impl ContentLedger {
    /// Purchase one-time access to a content item.
    ///
    /// Preconditions are checked in a fixed order for deterministic
    /// error reporting: active content, sufficient payment, no prior
    /// grant, buyer is not the creator. The grant, the revenue
    /// increment, and the payment settlement commit together or not at
    /// all — a transfer failure rolls back the grant.
    ///
    /// Exactly `price` units move to the creator and count toward
    /// revenue; any overpayment is refunded to the buyer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the content is unknown or inactive
    /// - [`LedgerError::InsufficientPayment`] if `amount_paid` is below
    ///   the current price
    /// - [`LedgerError::AlreadyPurchased`] if the buyer holds a grant
    /// - [`LedgerError::SelfPurchaseForbidden`] if the buyer owns the
    ///   content
    /// - [`LedgerError::Payment`] if settlement fails
    pub fn purchase(
        &self,
        buyer_id: &AccountId,
        content_id: ContentId,
        amount_paid: u64,
    ) -> Result<()> {
        self.db.with_tx(|tx| {
            let row = match queries::content::get(tx, content_id)? {
                Some(row) if row.active => row,
                _ => return Err(LedgerError::NotFound(content_id)),
            };
            if amount_paid < row.price {
                return Err(LedgerError::InsufficientPayment {
                    price: row.price,
                    paid: amount_paid,
                });
            }
            if queries::grants::exists(tx, content_id, buyer_id.as_str())? {
                return Err(LedgerError::AlreadyPurchased(content_id));
            }
            if buyer_id.as_str() == row.creator_id {
                return Err(LedgerError::SelfPurchaseForbidden(content_id));
            }

            queries::grants::insert(tx, content_id, buyer_id.as_str(), row.price, unix_now())?;
            queries::totals::add_revenue(tx, row.price)?;

            // Settlement is the last step: a failure here unwinds the
            // grant and the revenue increment with the transaction.
            let creator = AccountId::from(row.creator_id);
            self.payments.transfer(buyer_id, &creator, row.price)?;
            let overpaid = amount_paid - row.price;
            if overpaid > 0 {
                self.payments.refund(buyer_id, overpaid)?;
            }

            tracing::info!(
                content_id,
                buyer = %buyer_id,
                creator = %creator,
                price = row.price,
                "purchase complete"
            );
            Ok(())
        })
    }

    /// Whether a user may access a content item.
    ///
    /// The creator always has implicit access to their own content, even
    /// after tombstoning; a missing row cannot match the creator check
    /// and falls through to the grant lookup. Purchased access survives
    /// tombstoning.
    pub fn has_access(&self, user_id: &AccountId, content_id: ContentId) -> Result<bool> {
        self.db.with_conn(|conn| {
            if let Some(row) = queries::content::get(conn, content_id)? {
                if row.creator_id == user_id.as_str() {
                    return Ok(true);
                }
            }
            Ok(queries::grants::exists(conn, content_id, user_id.as_str())?)
        })
    }

    /// Fetch the purchase receipt for (content, buyer), if any.
    pub fn grant(&self, content_id: ContentId, buyer_id: &AccountId) -> Result<Option<AccessGrant>> {
        self.db.with_conn(|conn| {
            let row = queries::grants::get(conn, content_id, buyer_id.as_str())?;
            Ok(row.map(|row| AccessGrant {
                content_id: row.content_id,
                buyer_id: AccountId::from(row.buyer_id),
                granted_at: row.granted_at,
                price_paid: row.price_paid,
            }))
        })
    }

    /// Number of completed purchases for a content item.
    pub fn purchase_count(&self, content_id: ContentId) -> Result<u64> {
        self.db
            .with_conn(|conn| Ok(queries::grants::count_for_content(conn, content_id)?))
    }

    /// All-time revenue of a content item, at the price each purchase
    /// was made.
    pub fn content_revenue(&self, content_id: ContentId) -> Result<u64> {
        self.db
            .with_conn(|conn| Ok(queries::grants::revenue_for_content(conn, content_id)?))
    }
}
