//! PostgreSQL implementations of the store traits.

pub mod notification;
pub mod tenancy;

pub use notification::PgNotificationStore;
pub use tenancy::PgTenancyStore;
