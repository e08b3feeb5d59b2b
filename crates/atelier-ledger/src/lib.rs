//! # atelier-ledger
//!
//! Content catalog and purchase ledger. Owns content records, access
//! grants, and the revenue total exclusively. Creator identity is
//! validated at the marketplace façade; the ledger itself accepts any
//! non-empty creator id.
//!
//! ## Modules
//!
//! - [`catalog`] — content creation, price updates, tombstoning, reads
//! - [`purchase`] — purchases, access checks, earnings reads

pub mod catalog;
pub mod purchase;

use std::sync::Arc;

use atelier_db::{Db, DbError};
use atelier_payments::{PaymentError, PaymentProcessor};
use atelier_types::ContentId;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Validation failure: empty creator id, empty title or content
    /// reference, non-positive price.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unknown or inactive content.
    #[error("content not found: {0}")]
    NotFound(ContentId),

    /// Caller is not the owning creator.
    #[error("caller does not own content {0}")]
    Forbidden(ContentId),

    /// The buyer already holds a grant for this content.
    #[error("content {0} already purchased")]
    AlreadyPurchased(ContentId),

    /// Creators cannot purchase their own content.
    #[error("creators cannot purchase their own content {0}")]
    SelfPurchaseForbidden(ContentId),

    /// The offered amount does not cover the price.
    #[error("insufficient payment: price {price}, paid {paid}")]
    InsufficientPayment { price: u64, paid: u64 },

    /// Payment settlement failed; the enclosing purchase rolls back.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Store failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Content and purchase ledger over the shared store.
#[derive(Clone)]
pub struct ContentLedger {
    db: Db,
    payments: Arc<dyn PaymentProcessor>,
}

impl ContentLedger {
    pub fn new(db: Db, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self { db, payments }
    }
}
