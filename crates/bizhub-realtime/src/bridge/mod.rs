//! Transports that carry frames beyond this process.

#[cfg(feature = "redis-pubsub")]
pub mod redis_pubsub;

#[cfg(feature = "redis-pubsub")]
pub use redis_pubsub::RedisTransport;
