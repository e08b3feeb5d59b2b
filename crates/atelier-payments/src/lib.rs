//! # atelier-payments
//!
//! The payment settlement boundary of the marketplace. The ledger calls
//! [`PaymentProcessor`] inside its purchase transaction; any failure here
//! aborts that transaction, so no grant is ever created without the
//! corresponding funds moving.
//!
//! ## Modules
//!
//! - [`escrow`] — in-process escrow implementation for tests and demos

pub mod escrow;

pub use escrow::MemoryEscrow;

use atelier_types::AccountId;

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Insufficient escrowed funds, unknown recipient, or processor
    /// unavailable.
    #[error("transfer failed: {0}")]
    TransferFailed(String),
}

/// Convenience result type for payment operations.
pub type Result<T> = std::result::Result<T, PaymentError>;

/// External payment collaborator.
///
/// Buyers escrow funds with the processor before purchasing; the ledger
/// directs the processor to settle exactly the content price to the
/// creator and to return any overpayment to the buyer.
pub trait PaymentProcessor: Send + Sync {
    /// Move `amount` of `from`'s escrowed funds to `to`.
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()>;

    /// Return `amount` of `to`'s escrowed funds to their own balance.
    fn refund(&self, to: &AccountId, amount: u64) -> Result<()>;
}
