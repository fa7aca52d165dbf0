//! Session connections.

pub mod handle;
pub mod manager;
pub mod pool;

pub use handle::ConnectionHandle;
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
