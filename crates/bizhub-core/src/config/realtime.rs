//! Realtime push configuration.

use serde::{Deserialize, Serialize};

/// Realtime (session room) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Prefix of per-actor notification rooms (`<prefix>:<actor_id>`).
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
    /// Outbound buffer size per session connection.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Maximum concurrent sessions per actor.
    #[serde(default = "default_max_connections_per_actor")]
    pub max_connections_per_actor: usize,
    /// Upper bound for a single topic publish, in milliseconds.
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,
    /// Redis URL for cross-node fan-out (requires the `redis-pubsub` feature).
    #[serde(default)]
    pub redis_url: Option<String>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            topic_prefix: default_topic_prefix(),
            channel_buffer_size: default_channel_buffer(),
            max_connections_per_actor: default_max_connections_per_actor(),
            publish_timeout_ms: default_publish_timeout(),
            redis_url: None,
        }
    }
}

fn default_topic_prefix() -> String {
    "notif".to_string()
}

fn default_channel_buffer() -> usize {
    256
}

fn default_max_connections_per_actor() -> usize {
    5
}

fn default_publish_timeout() -> u64 {
    2000
}
