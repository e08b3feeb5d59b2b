//! Catalog and purchase structures.

use serde::{Deserialize, Serialize};

use crate::{AccountId, ContentId};

/// A priced catalog item referencing externally stored material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
    pub content_id: ContentId,
    pub creator_id: AccountId,
    pub title: String,
    /// Opaque pointer to externally stored content. Never dereferenced
    /// by the core.
    pub content_ref: String,
    /// Price in the smallest currency unit. Always positive.
    pub price: u64,
    pub created_at: u64,
    /// Soft-delete flag. One-way: no reactivation path exists.
    pub active: bool,
}

/// A durable record that a buyer may access a content item.
///
/// Grants survive content deactivation and are never revoked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccessGrant {
    pub content_id: ContentId,
    pub buyer_id: AccountId,
    pub granted_at: u64,
    /// Price at the moment of purchase; later price changes do not
    /// rewrite it.
    pub price_paid: u64,
}

/// Platform-wide running aggregates.
///
/// Maintained incrementally inside the same transactions as the record
/// writes they count, so they always equal re-derivation from the full
/// record set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    /// Creators ever registered.
    pub total_creators: u64,
    /// Content items ever created, independent of active state.
    pub total_content_created: u64,
    /// Sum of every completed purchase's price at purchase time.
    pub total_revenue: u64,
}
