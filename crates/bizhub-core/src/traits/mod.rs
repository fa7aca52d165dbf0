//! Core traits defined in `bizhub-core` and implemented by other crates.

pub mod realtime;

pub use realtime::RealtimeTransport;
