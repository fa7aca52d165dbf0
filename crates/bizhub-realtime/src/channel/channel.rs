//! A single room.

use std::collections::HashSet;

use bizhub_core::types::ConnectionId;

/// A room and the sessions joined to it.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Room name.
    pub name: String,
    subscribers: HashSet<ConnectionId>,
}

impl Channel {
    /// An empty room.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: HashSet::new(),
        }
    }

    /// Join a session. Returns false if it was already present.
    pub fn join(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.insert(conn_id)
    }

    /// Remove a session.
    pub fn leave(&mut self, conn_id: ConnectionId) -> bool {
        self.subscribers.remove(&conn_id)
    }

    /// Number of joined sessions.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is joined.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Snapshot of the joined sessions.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.subscribers.iter().copied().collect()
    }
}
