//! # atelier-hub
//!
//! Orchestration façade over the creator registry and the content
//! ledger. External callers go through the hub: it enforces the
//! cross-entity precondition (content is created by registered creators
//! only), composes onboarding and publication into one atomic
//! transaction, forwards purchases, and exposes the platform aggregates
//! and the event stream.
//!
//! ## Modules
//!
//! - [`config`] — TOML-backed configuration
//! - [`events`] — broadcast event bus

pub mod config;
pub mod events;

pub use config::HubConfig;
pub use events::EventBus;

use std::sync::Arc;

use atelier_db::{queries, Db, DbError};
use atelier_ledger::{catalog, ContentLedger, LedgerError};
use atelier_payments::PaymentProcessor;
use atelier_registry::{creators, CreatorRegistry, RegistryError};
use atelier_types::events::{Event, EventType};
use atelier_types::{unix_now, AccountId, Content, ContentId, Creator, PlatformStats};
use tokio::sync::broadcast;

/// Error types for façade operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Content operations require a registered creator.
    #[error("account not registered: {0}")]
    NotRegistered(AccountId),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for façade operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// The marketplace façade.
///
/// Cheap to clone; clones share the store, the payment processor, and
/// the event bus, and may be used from any number of threads.
#[derive(Clone)]
pub struct MarketplaceHub {
    db: Db,
    registry: CreatorRegistry,
    ledger: ContentLedger,
    events: EventBus,
}

impl MarketplaceHub {
    /// Build a hub over an already-open store.
    pub fn new(db: Db, payments: Arc<dyn PaymentProcessor>) -> Self {
        Self::with_event_capacity(db, payments, config::EventConfig::default().buffer_capacity)
    }

    /// Build a hub with an explicit event buffer capacity.
    pub fn with_event_capacity(
        db: Db,
        payments: Arc<dyn PaymentProcessor>,
        event_capacity: usize,
    ) -> Self {
        Self {
            registry: CreatorRegistry::new(db.clone()),
            ledger: ContentLedger::new(db.clone(), payments),
            events: EventBus::new(event_capacity),
            db,
        }
    }

    /// Open the configured store and build a hub over it.
    pub fn open(config: &HubConfig, payments: Arc<dyn PaymentProcessor>) -> Result<Self> {
        let db = match config.db_path() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                tracing::info!(path = %path.display(), "opening marketplace store");
                Db::open(&path)?
            }
            None => {
                tracing::info!("opening in-memory marketplace store");
                Db::open_memory()?
            }
        };
        Ok(Self::with_event_capacity(
            db,
            payments,
            config.events.buffer_capacity,
        ))
    }

    /// Register a new creator.
    pub fn register_creator(
        &self,
        identity: &AccountId,
        username: &str,
        bio: &str,
    ) -> Result<()> {
        self.registry.register(identity, username, bio)?;
        self.events.emit(
            EventType::CreatorRegistered,
            serde_json::json!({ "account_id": identity, "username": username }),
        );
        Ok(())
    }

    /// Update a creator's profile.
    pub fn update_creator(&self, identity: &AccountId, username: &str, bio: &str) -> Result<()> {
        self.registry.update(identity, username, bio)?;
        self.events.emit(
            EventType::CreatorUpdated,
            serde_json::json!({ "account_id": identity, "username": username }),
        );
        Ok(())
    }

    /// Publish content for a registered creator.
    ///
    /// # Errors
    ///
    /// - [`HubError::NotRegistered`] if the identity has no creator
    ///   record
    pub fn create_content(
        &self,
        identity: &AccountId,
        title: &str,
        content_ref: &str,
        price: u64,
    ) -> Result<ContentId> {
        if !self.registry.is_registered(identity)? {
            return Err(HubError::NotRegistered(identity.clone()));
        }
        let content_id = self.ledger.create_content(identity, title, content_ref, price)?;
        self.events.emit(
            EventType::ContentPublished,
            serde_json::json!({ "content_id": content_id, "creator": identity, "price": price }),
        );
        Ok(content_id)
    }

    /// Register (when needed) and publish in one atomic unit.
    ///
    /// Both writes share one transaction: if content creation fails,
    /// a registration performed in the same call rolls back with it —
    /// there is no state where the creator exists but the intended
    /// content does not.
    pub fn register_and_create_content(
        &self,
        identity: &AccountId,
        username: &str,
        bio: &str,
        title: &str,
        content_ref: &str,
        price: u64,
    ) -> Result<ContentId> {
        let (content_id, newly_registered) = self.db.with_tx(|tx| {
            let now = unix_now();
            let newly_registered = !creators::is_registered_tx(tx, identity)?;
            if newly_registered {
                creators::register_tx(tx, identity, username, bio, now)?;
            }
            let content_id =
                catalog::create_content_tx(tx, identity, title, content_ref, price, now)?;
            Ok::<_, HubError>((content_id, newly_registered))
        })?;

        if newly_registered {
            self.events.emit(
                EventType::CreatorRegistered,
                serde_json::json!({ "account_id": identity, "username": username }),
            );
        }
        self.events.emit(
            EventType::ContentPublished,
            serde_json::json!({ "content_id": content_id, "creator": identity, "price": price }),
        );
        Ok(content_id)
    }

    /// Purchase access to a content item, forwarding the exact amount
    /// received from the caller.
    pub fn purchase_content(
        &self,
        buyer_id: &AccountId,
        content_id: ContentId,
        amount_paid: u64,
    ) -> Result<()> {
        self.ledger.purchase(buyer_id, content_id, amount_paid)?;
        self.events.emit(
            EventType::PurchaseComplete,
            serde_json::json!({ "content_id": content_id, "buyer": buyer_id }),
        );
        Ok(())
    }

    /// Change the price of owned content.
    pub fn update_price(
        &self,
        caller: &AccountId,
        content_id: ContentId,
        new_price: u64,
    ) -> Result<()> {
        self.ledger.update_price(caller, content_id, new_price)?;
        self.events.emit(
            EventType::PriceChanged,
            serde_json::json!({ "content_id": content_id, "new_price": new_price }),
        );
        Ok(())
    }

    /// Tombstone owned content. Irreversible; prior purchases keep
    /// their access.
    pub fn deactivate_content(&self, caller: &AccountId, content_id: ContentId) -> Result<()> {
        self.ledger.deactivate(caller, content_id)?;
        self.events.emit(
            EventType::ContentTombstoned,
            serde_json::json!({ "content_id": content_id }),
        );
        Ok(())
    }

    /// Read the stored platform aggregates.
    pub fn get_platform_stats(&self) -> Result<PlatformStats> {
        self.db.with_conn(|conn| Ok(queries::totals::get(conn)?))
    }

    /// Re-derive the aggregates from the full record set. Always equals
    /// [`Self::get_platform_stats`].
    pub fn recompute_stats(&self) -> Result<PlatformStats> {
        self.db
            .with_conn(|conn| Ok(queries::totals::recompute(conn)?))
    }

    /// Whether the identity has a creator record.
    pub fn is_creator(&self, identity: &AccountId) -> Result<bool> {
        Ok(self.registry.is_registered(identity)?)
    }

    /// Whether the user may access the content item.
    pub fn has_access_to_content(&self, user_id: &AccountId, content_id: ContentId) -> Result<bool> {
        Ok(self.ledger.has_access(user_id, content_id)?)
    }

    /// Fetch a creator profile.
    pub fn get_creator(&self, identity: &AccountId) -> Result<Creator> {
        Ok(self.registry.get(identity)?)
    }

    /// Fetch an active content item.
    pub fn get_content(&self, content_id: ContentId) -> Result<Content> {
        Ok(self.ledger.get_content(content_id)?)
    }

    /// Every id the creator has published, in creation order.
    pub fn creator_content(&self, identity: &AccountId) -> Result<Vec<ContentId>> {
        Ok(self.ledger.creator_content(identity)?)
    }

    /// Subscribe to marketplace events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
