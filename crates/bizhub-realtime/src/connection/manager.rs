//! Session lifecycle and in-process room delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use bizhub_core::config::RealtimeConfig;
use bizhub_core::error::AppError;
use bizhub_core::result::AppResult;
use bizhub_core::traits::RealtimeTransport;
use bizhub_core::types::{ActorId, ConnectionId};

use crate::channel::{ChannelRegistry, TopicScheme};
use crate::message::OutboundMessage;
use crate::metrics::RealtimeMetrics;

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Owns every live session and the rooms they are joined to.
///
/// Each registered session joins its actor's room, so a publish to
/// `<prefix>:<actor_id>` reaches every session of that actor.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    rooms: ChannelRegistry,
    metrics: Arc<RealtimeMetrics>,
    topics: TopicScheme,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Create a manager with no sessions.
    pub fn new(config: RealtimeConfig, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms: ChannelRegistry::new(),
            metrics,
            topics: TopicScheme::new(config.topic_prefix.clone()),
            config,
        }
    }

    /// Register a session for an actor and join it to the actor's room.
    ///
    /// When the actor is at the session cap, the oldest session is closed.
    pub fn register(&self, actor_id: ActorId) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(actor_id, tx));

        let existing = self.pool.actor_connections(&actor_id);
        let max = self.config.max_connections_per_actor.max(1);
        if existing.len() >= max {
            warn!(
                actor_id = %actor_id,
                count = existing.len(),
                max,
                "Actor at session cap, closing oldest session"
            );
            let excess = existing.len() + 1 - max;
            for oldest in existing.iter().take(excess) {
                self.unregister(&oldest.id);
            }
        }

        self.pool.add(handle.clone());
        self.rooms.join(&self.topics.for_actor(actor_id), handle.id);
        self.metrics.connection_opened();

        info!(conn_id = %handle.id, actor_id = %actor_id, "Session registered");
        (handle, rx)
    }

    /// Drop a session and leave all its rooms.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            self.rooms.leave_all(*conn_id);
            self.metrics.connection_closed();
            info!(conn_id = %conn_id, actor_id = %handle.actor_id, "Session unregistered");
        }
    }

    /// Join a session to an extra room. Other actors' rooms are refused.
    pub fn join_room(&self, conn_id: &ConnectionId, room: &str) -> AppResult<()> {
        let handle = self
            .pool
            .get(conn_id)
            .ok_or_else(|| AppError::not_found(format!("Session {conn_id} not found")))?;
        if let Some(owner) = self.topics.parse(room) {
            if owner != handle.actor_id {
                return Err(AppError::authorization(format!(
                    "Not authorized to join room '{room}'"
                )));
            }
        }
        self.rooms.join(room, handle.id);
        debug!(conn_id = %conn_id, room, "Joined extra room");
        Ok(())
    }

    /// Hand a serialized frame to every session in a room.
    pub fn deliver(&self, room: &str, frame: &str) -> usize {
        let mut sent = 0;
        for conn_id in self.rooms.members(room) {
            match self.pool.get(&conn_id) {
                Some(handle) if handle.send(frame) => sent += 1,
                Some(handle) if !handle.is_alive() => self.unregister(&handle.id),
                _ => {}
            }
        }
        self.metrics.messages_sent(sent as u64);
        sent
    }

    /// Send a message to every session of an actor.
    pub fn send_to_actor(&self, actor_id: ActorId, message: &OutboundMessage) -> AppResult<usize> {
        let frame = serde_json::to_string(message)?;
        Ok(self.deliver(&self.topics.for_actor(actor_id), &frame))
    }

    /// The room naming used by this manager.
    pub fn topics(&self) -> &TopicScheme {
        &self.topics
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of connected actors.
    pub fn actor_count(&self) -> usize {
        self.pool.actor_count()
    }

    /// Whether the actor has any live session.
    pub fn is_actor_connected(&self, actor_id: &ActorId) -> bool {
        !self.pool.actor_connections(actor_id).is_empty()
    }
}

#[async_trait]
impl RealtimeTransport for ConnectionManager {
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> AppResult<usize> {
        let frame = serde_json::to_string(payload)?;
        Ok(self.deliver(topic, &frame))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
