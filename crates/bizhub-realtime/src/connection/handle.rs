//! A single live session.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::warn;

use bizhub_core::types::{ActorId, ConnectionId};

/// Sender side of one connected session.
///
/// Frames are pre-serialized JSON so one payload is encoded once per publish.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Connection id.
    pub id: ConnectionId,
    /// The actor the session belongs to.
    pub actor_id: ActorId,
    /// When the session connected.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// New handle pushing into `sender`.
    pub fn new(actor_id: ActorId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            actor_id,
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a frame without waiting. Returns false if it was dropped.
    pub fn send(&self, frame: &str) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame.to_string()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Session buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Whether the session can still receive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.sender.is_closed()
    }

    /// Stop delivering to this session.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
