//! # atelier-registry
//!
//! Creator identity registry. Owns creator records exclusively: one
//! record per account, created by registration, mutable only in its
//! profile fields, never destroyed.
//!
//! ## Modules
//!
//! - [`creators`] — registration, profile updates, lookups

pub mod creators;

pub use creators::CreatorRegistry;

use atelier_db::DbError;

/// Error types for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Validation failure: empty identity, empty/oversized username or
    /// bio.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The account already has a creator record.
    #[error("account already registered: {0}")]
    AlreadyRegistered(String),

    /// The account has no active creator record.
    #[error("account not registered: {0}")]
    NotRegistered(String),

    /// Lookup target does not exist.
    #[error("creator not found: {0}")]
    NotFound(String),

    /// Store failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Convenience result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
