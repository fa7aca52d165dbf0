//! Business (tenant) and business membership entities.

pub mod member;
pub mod model;

pub use member::{BusinessMember, BusinessUser};
pub use model::Business;
