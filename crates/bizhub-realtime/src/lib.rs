//! # bizhub-realtime
//!
//! Live push of notification events to connected sessions.
//!
//! - Per-actor session rooms (`<prefix>:<actor_id>`) over a channel registry
//! - Connection lifecycle with a per-actor session cap
//! - `RealtimePublisher`, the fire-and-forget fan-out used after dispatch
//! - Optional Redis PUBLISH transport for multi-node deployments

pub mod bridge;
pub mod channel;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod publisher;

pub use channel::{ChannelRegistry, TopicScheme};
pub use connection::ConnectionManager;
pub use message::OutboundMessage;
pub use metrics::RealtimeMetrics;
pub use publisher::{PublishReport, RealtimePublisher};
