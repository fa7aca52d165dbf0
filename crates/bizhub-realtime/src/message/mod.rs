//! Frames pushed to sessions.

pub mod types;

pub use types::OutboundMessage;
