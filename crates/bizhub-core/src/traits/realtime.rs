//! Realtime transport trait for live session pushes.

use async_trait::async_trait;

use crate::result::AppResult;

/// Message-passing seam between the notification core and whatever carries
/// events to connected sessions (in-process rooms, Redis pub/sub, SSE).
///
/// Delivery is at-most-once: implementations should not retry, and callers
/// treat any error as a lost push rather than a failed operation.
#[async_trait]
pub trait RealtimeTransport: Send + Sync + 'static {
    /// Publish `payload` to every subscriber of `topic`.
    ///
    /// Returns the number of sessions the payload was handed to, when the
    /// transport can tell.
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> AppResult<usize>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}
