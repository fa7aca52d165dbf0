//! # bizhub-database
//!
//! Store traits consumed by the access and notification engines, their
//! PostgreSQL repository implementations, and an in-memory implementation
//! for single-process use and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use repositories::{PgNotificationStore, PgTenancyStore};
pub use store::{NotificationStore, TenancyStore};
