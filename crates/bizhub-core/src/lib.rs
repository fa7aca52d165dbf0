//! # bizhub-core
//!
//! Core crate for Bizhub. Contains configuration schemas, typed
//! identifiers, pagination types, the realtime transport trait, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Bizhub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
