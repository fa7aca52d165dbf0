//! Realtime counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Process-wide realtime counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
    frames_sent: AtomicU64,
    publishes_failed: AtomicU64,
}

impl RealtimeMetrics {
    /// Zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a registered session.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Count an unregistered session.
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count frames handed to sessions.
    pub fn messages_sent(&self, count: u64) {
        self.frames_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Count a failed or timed-out topic publish.
    pub fn publish_failed(&self) {
        self.publishes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Current values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        MetricsSnapshot {
            connections_opened: opened,
            connections_active: opened.saturating_sub(closed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            publishes_failed: self.publishes_failed.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`RealtimeMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sessions ever registered.
    pub connections_opened: u64,
    /// Sessions currently registered.
    pub connections_active: u64,
    /// Frames handed to sessions.
    pub frames_sent: u64,
    /// Topic publishes that failed or timed out.
    pub publishes_failed: u64,
}
