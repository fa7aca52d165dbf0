//! Actor (user account) entity.

pub mod model;

pub use model::Actor;
