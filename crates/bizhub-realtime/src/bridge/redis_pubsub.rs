//! Redis PUBLISH transport for multi-node deployments.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::info;

use bizhub_core::error::{AppError, ErrorKind};
use bizhub_core::result::AppResult;
use bizhub_core::traits::RealtimeTransport;

/// Publishes each topic as a Redis channel for the gateway nodes that hold
/// the sessions.
#[derive(Clone)]
pub struct RedisTransport {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisTransport").finish_non_exhaustive()
    }
}

impl RedisTransport {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> AppResult<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Realtime, "Redis connection failed", e)
        })?;
        info!("Connected realtime transport to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl RealtimeTransport for RedisTransport {
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> AppResult<usize> {
        let message = serde_json::to_string(payload)?;
        let mut conn = self.conn.clone();
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(topic)
            .arg(message)
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Realtime, "Redis PUBLISH failed", e))?;
        Ok(receivers.max(0) as usize)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
