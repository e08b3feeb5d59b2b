//! Creator registration and profile management.
//!
//! Each public operation runs as one transaction against the shared
//! store. The `*_tx` forms operate on an open transaction so the
//! marketplace façade can compose registration with other writes into a
//! single atomic unit.

use atelier_db::{queries, Db};
use atelier_types::{unix_now, AccountId, Creator, MAX_BIO_CHARS, MAX_USERNAME_CHARS};
use rusqlite::Connection;

use crate::{RegistryError, Result};

/// Creator identity registry over the shared store.
#[derive(Clone)]
pub struct CreatorRegistry {
    db: Db,
}

impl CreatorRegistry {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Register a new creator. Counts toward the platform total in the
    /// same transaction.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidInput`] on validation failure
    /// - [`RegistryError::AlreadyRegistered`] if the account has a record
    pub fn register(&self, identity: &AccountId, username: &str, bio: &str) -> Result<()> {
        self.db
            .with_tx(|tx| register_tx(tx, identity, username, bio, unix_now()))
    }

    /// Overwrite a creator's username and bio. Identity and creation
    /// time are untouched.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidInput`] on validation failure
    /// - [`RegistryError::NotRegistered`] if the account has no record
    pub fn update(&self, identity: &AccountId, username: &str, bio: &str) -> Result<()> {
        self.db.with_tx(|tx| update_tx(tx, identity, username, bio))
    }

    /// Whether the account has an active creator record.
    pub fn is_registered(&self, identity: &AccountId) -> Result<bool> {
        self.db.with_conn(|conn| is_registered_tx(conn, identity))
    }

    /// Fetch a creator profile.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if the account is not registered
    pub fn get(&self, identity: &AccountId) -> Result<Creator> {
        self.db.with_conn(|conn| get_tx(conn, identity))
    }
}

/// Transaction-composable form of [`CreatorRegistry::register`].
pub fn register_tx(
    conn: &Connection,
    identity: &AccountId,
    username: &str,
    bio: &str,
    now: u64,
) -> Result<()> {
    validate_identity(identity)?;
    validate_profile(username, bio)?;

    if queries::creators::exists(conn, identity.as_str())? {
        return Err(RegistryError::AlreadyRegistered(identity.to_string()));
    }

    queries::creators::insert(conn, identity.as_str(), username, bio, now)?;
    queries::totals::increment_creators(conn)?;

    tracing::info!(account = %identity, username, "creator registered");
    Ok(())
}

/// Transaction-composable form of [`CreatorRegistry::update`].
pub fn update_tx(
    conn: &Connection,
    identity: &AccountId,
    username: &str,
    bio: &str,
) -> Result<()> {
    validate_identity(identity)?;
    validate_profile(username, bio)?;

    let updated = queries::creators::update_profile(conn, identity.as_str(), username, bio)?;
    if updated == 0 {
        return Err(RegistryError::NotRegistered(identity.to_string()));
    }

    tracing::info!(account = %identity, username, "creator profile updated");
    Ok(())
}

/// Transaction-composable form of [`CreatorRegistry::is_registered`].
pub fn is_registered_tx(conn: &Connection, identity: &AccountId) -> Result<bool> {
    Ok(queries::creators::exists(conn, identity.as_str())?)
}

/// Transaction-composable form of [`CreatorRegistry::get`].
pub fn get_tx(conn: &Connection, identity: &AccountId) -> Result<Creator> {
    let row = queries::creators::get(conn, identity.as_str())?
        .filter(|row| row.active)
        .ok_or_else(|| RegistryError::NotFound(identity.to_string()))?;

    Ok(Creator {
        account_id: AccountId::from(row.account_id),
        username: row.username,
        bio: row.bio,
        created_at: row.created_at,
        active: row.active,
    })
}

fn validate_identity(identity: &AccountId) -> Result<()> {
    if identity.is_empty() {
        return Err(RegistryError::InvalidInput("identity must be non-empty".into()));
    }
    Ok(())
}

fn validate_profile(username: &str, bio: &str) -> Result<()> {
    let username_chars = username.chars().count();
    if username_chars == 0 {
        return Err(RegistryError::InvalidInput("username must be non-empty".into()));
    }
    if username_chars > MAX_USERNAME_CHARS {
        return Err(RegistryError::InvalidInput(format!(
            "username exceeds {MAX_USERNAME_CHARS} characters"
        )));
    }
    if bio.chars().count() > MAX_BIO_CHARS {
        return Err(RegistryError::InvalidInput(format!(
            "bio exceeds {MAX_BIO_CHARS} characters"
        )));
    }
    Ok(())
}
