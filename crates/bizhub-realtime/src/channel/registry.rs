//! Registry of live rooms.

use dashmap::DashMap;
use tracing::trace;

use bizhub_core::types::ConnectionId;

use super::channel::Channel;
use super::subscription::SubscriptionTracker;

/// All rooms with at least one session. Empty rooms are dropped.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    rooms: DashMap<String, Channel>,
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Join a session to a room, creating the room if needed.
    pub fn join(&self, room: &str, conn_id: ConnectionId) {
        self.rooms
            .entry(room.to_string())
            .or_insert_with(|| Channel::new(room))
            .join(conn_id);
        self.subscriptions.add(conn_id, room);
        trace!(room, conn_id = %conn_id, "Joined room");
    }

    /// Remove a session from one room.
    pub fn leave(&self, room: &str, conn_id: ConnectionId) {
        self.leave_room(room, conn_id);
        self.subscriptions.remove(conn_id, room);
    }

    /// Remove a session from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        for room in self.subscriptions.remove_all(conn_id) {
            self.leave_room(&room, conn_id);
        }
    }

    fn leave_room(&self, room: &str, conn_id: ConnectionId) {
        self.rooms.remove_if_mut(room, |_, channel| {
            channel.leave(conn_id);
            channel.is_empty()
        });
    }

    /// Sessions currently in a room.
    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|channel| channel.members())
            .unwrap_or_default()
    }

    /// Rooms a session has joined.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> Vec<String> {
        self.subscriptions.rooms(conn_id).into_iter().collect()
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_leave_all_drops_empty_rooms() {
        let registry = ChannelRegistry::new();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        registry.join("notif:1", a);
        registry.join("notif:1", b);
        registry.join("notif:2", a);
        assert_eq!(registry.room_count(), 2);
        assert_eq!(registry.members("notif:1").len(), 2);

        registry.leave_all(a);
        assert_eq!(registry.members("notif:1"), vec![b]);
        assert!(registry.members("notif:2").is_empty());
        assert_eq!(registry.room_count(), 1);
        assert!(registry.rooms_of(a).is_empty());

        registry.leave("notif:1", b);
        assert_eq!(registry.room_count(), 0);
    }
}
