//! Navigation breadcrumbs: the last private conversation and the last room
//! the user looked at. Best-effort UX continuity, nothing more; the server
//! never sees them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::{self, KeyValueStore};

const PRIVATE_PARTNER_KEY: &str = "lastPrivateChatPartner";
const ROOM_KEY: &str = "lastRoomChat";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumbs {
    pub last_private_partner: Option<String>,
    pub last_room: Option<String>,
}

/// In-memory breadcrumbs mirrored to a [`KeyValueStore`].
pub struct BreadcrumbStore {
    store: Arc<dyn KeyValueStore>,
    current: Breadcrumbs,
}

impl BreadcrumbStore {
    /// Memory starts empty; call [`restore`](Self::restore) at session start.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: Breadcrumbs::default(),
        }
    }

    pub fn current(&self) -> &Breadcrumbs {
        &self.current
    }

    /// Called every time a private conversation is on screen.
    pub fn record_private_partner(&mut self, name: &str) {
        storage::save(self.store.as_ref(), PRIVATE_PARTNER_KEY, name);
        self.current.last_private_partner = Some(name.to_string());
    }

    /// Called every time a room is on screen.
    pub fn record_room(&mut self, name: &str) {
        storage::save(self.store.as_ref(), ROOM_KEY, name);
        self.current.last_room = Some(name.to_string());
    }

    /// Reload the persisted pair into memory and return it.
    pub fn restore(&mut self) -> Breadcrumbs {
        self.current = Breadcrumbs {
            last_private_partner: storage::load(self.store.as_ref(), PRIVATE_PARTNER_KEY),
            last_room: storage::load(self.store.as_ref(), ROOM_KEY),
        };
        self.current.clone()
    }

    pub fn clear(&mut self) {
        storage::remove(self.store.as_ref(), PRIVATE_PARTNER_KEY);
        storage::remove(self.store.as_ref(), ROOM_KEY);
        self.current = Breadcrumbs::default();
    }
}
