//! # bizhub-entity
//!
//! Domain entity models for Bizhub. Every struct in this crate represents
//! a database table row or a domain value object. Row entities derive
//! `sqlx::FromRow` and use the typed identifiers from `bizhub-core`.

pub mod actor;
pub mod business;
pub mod notification;
pub mod permission;
pub mod role;
