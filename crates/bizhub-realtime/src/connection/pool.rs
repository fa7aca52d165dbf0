//! Live sessions indexed by id and by actor.

use std::sync::Arc;

use dashmap::DashMap;

use bizhub_core::types::{ActorId, ConnectionId};

use super::handle::ConnectionHandle;

/// Thread-safe set of live sessions. An actor may hold several.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_actor: DashMap<ActorId, Vec<Arc<ConnectionHandle>>>,
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle.clone());
        self.by_actor.entry(handle.actor_id).or_default().push(handle);
    }

    /// Remove a session.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        self.by_actor.remove_if_mut(&handle.actor_id, |_, sessions| {
            sessions.retain(|c| c.id != *conn_id);
            sessions.is_empty()
        });
        Some(handle)
    }

    /// Look a session up.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Sessions of one actor, oldest first.
    pub fn actor_connections(&self, actor_id: &ActorId) -> Vec<Arc<ConnectionHandle>> {
        self.by_actor
            .get(actor_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of actors with at least one session.
    pub fn actor_count(&self) -> usize {
        self.by_actor.len()
    }
}
