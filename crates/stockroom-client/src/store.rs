//! # Entity Store
//!
//! Per-collection snapshot cache with CRUD through the gateway.
//!
//! ## Snapshot Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   list() #1 issued ─────────────────────────────┐                       │
//! │   list() #2 issued ──────────┐                  │                       │
//! │                              ▼                  ▼                       │
//! │                     #2 arrives: applied   #1 arrives: 1 < 2, dropped    │
//! │                                                                         │
//! │   Each list() takes a ticket when it is issued. A response replaces    │
//! │   the snapshot only if its ticket is newer than the snapshot's, so the │
//! │   most recently issued reload wins whatever the arrival order.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Mutations
//! `create`, `update` and `delete` never touch the snapshot. The caller
//! follows every successful mutation with `list()`, and a create is matched
//! to its entity only from that reloaded snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use stockroom_core::{Ack, Entity, EntityId};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::gateway::ApiGateway;

/// A successful create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<T> {
    /// The server's confirmation text.
    pub message: String,
    pub entity: T,
}

struct Snapshot<T> {
    items: Vec<T>,
    /// Ticket of the list() that produced `items` (0 = never loaded).
    ticket: u64,
}

// =============================================================================
// Entity Store
// =============================================================================

/// Cache and CRUD for one collection.
pub struct EntityStore<T: Entity> {
    gateway: ApiGateway,
    snapshot: RwLock<Snapshot<T>>,
    tickets: AtomicU64,
}

impl<T: Entity> EntityStore<T> {
    pub fn new(gateway: ApiGateway) -> Self {
        EntityStore {
            gateway,
            snapshot: RwLock::new(Snapshot {
                items: Vec::new(),
                ticket: 0,
            }),
            tickets: AtomicU64::new(0),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Snapshot<T>> {
        self.snapshot.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Snapshot<T>> {
        self.snapshot.write().unwrap_or_else(|e| e.into_inner())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches the whole collection and replaces the snapshot.
    ///
    /// Returns the snapshot as it stands afterwards. If a newer `list()`
    /// already landed, this response is dropped and that newer snapshot is
    /// returned instead. On failure the snapshot is untouched.
    pub async fn list(&self) -> ClientResult<Vec<T>> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        let kind = T::KIND;

        let items: Vec<T> = self.gateway.get(&kind.collection_path()).await?;

        let mut snapshot = self.write();
        if ticket > snapshot.ticket {
            debug!(%kind, ticket, count = items.len(), "Snapshot replaced");
            snapshot.items = items;
            snapshot.ticket = ticket;
        } else {
            warn!(
                %kind,
                ticket,
                current = snapshot.ticket,
                "Superseded list response dropped"
            );
        }
        Ok(snapshot.items.clone())
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub fn get(&self, id: EntityId) -> Option<T> {
        self.read().items.iter().find(|e| e.id() == id).cloned()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.read().items.iter().any(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// True once any list() has been applied.
    pub fn is_loaded(&self) -> bool {
        self.read().ticket > 0
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// POSTs a new entity and returns the server's acknowledgement.
    ///
    /// An acknowledged POST is stored; nothing after it can undo that. The
    /// caller reloads the collection and then looks the entity up with
    /// [`EntityStore::find_created`].
    pub async fn create(&self, draft: &T::Draft) -> ClientResult<Ack> {
        let kind = T::KIND;
        let ack: Ack = self.gateway.post(&kind.collection_path(), draft).await?;
        info!(%kind, id = ?ack.id, "Created");
        Ok(ack)
    }

    /// Finds a just-created entity in the snapshot.
    ///
    /// The API only answers `{message}` (some deployments add the new `id`).
    /// With an id that entity is returned; otherwise the newest entity
    /// carrying the draft's name.
    pub fn find_created(&self, ack: &Ack, draft: &T::Draft) -> Option<T> {
        let snapshot = self.read();
        match ack.id {
            Some(id) => snapshot.items.iter().find(|e| e.id() == id).cloned(),
            None => {
                let name = T::draft_name(draft);
                snapshot
                    .items
                    .iter()
                    .filter(|e| e.name() == name)
                    .max_by_key(|e| e.id())
                    .cloned()
            }
        }
    }

    /// PUTs a draft over an entity from the current snapshot.
    ///
    /// ## Errors
    /// [`ClientError::InvalidReference`] before any request when `id` is not
    /// positive or not in the snapshot.
    pub async fn update(&self, id: EntityId, draft: &T::Draft) -> ClientResult<Saved<T>> {
        let kind = T::KIND;
        let current = if id > 0 { self.get(id) } else { None };
        let current = current.ok_or(ClientError::InvalidReference { kind, id })?;

        let ack: Ack = self.gateway.put(&kind.item_path(id), draft).await?;
        info!(%kind, id, "Updated");

        Ok(Saved {
            message: ack.message,
            entity: current.with_draft(draft),
        })
    }

    /// DELETEs an entity. Server errors (such as a repeated delete) come back
    /// unchanged.
    pub async fn delete(&self, id: EntityId) -> ClientResult<Ack> {
        let kind = T::KIND;
        let ack: Ack = self.gateway.delete(&kind.item_path(id)).await?;
        info!(%kind, id, "Deleted");
        Ok(ack)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
