//! Reverse index from sessions to the rooms they joined.

use std::collections::HashSet;

use dashmap::DashMap;

use bizhub_core::types::ConnectionId;

/// Connection → joined room names.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    rooms_by_conn: DashMap<ConnectionId, HashSet<String>>,
}

impl SubscriptionTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `conn_id` joined `room`.
    pub fn add(&self, conn_id: ConnectionId, room: &str) {
        self.rooms_by_conn
            .entry(conn_id)
            .or_default()
            .insert(room.to_string());
    }

    /// Record that `conn_id` left `room`.
    pub fn remove(&self, conn_id: ConnectionId, room: &str) {
        let now_empty = match self.rooms_by_conn.get_mut(&conn_id) {
            Some(mut rooms) => {
                rooms.remove(room);
                rooms.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.rooms_by_conn.remove(&conn_id);
        }
    }

    /// Rooms joined by a connection.
    pub fn rooms(&self, conn_id: ConnectionId) -> HashSet<String> {
        self.rooms_by_conn
            .get(&conn_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Forget a connection, returning the rooms it was in.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<String> {
        self.rooms_by_conn
            .remove(&conn_id)
            .map(|(_, rooms)| rooms)
            .unwrap_or_default()
    }
}
