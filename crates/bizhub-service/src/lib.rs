//! # bizhub-service
//!
//! Use cases on top of the stores: recipient resolution, notification
//! dispatch with realtime fan-out, and the "my notifications" inbox.
//!
//! Services take their dependencies at construction time as `Arc` handles.

pub mod context;
pub mod notification;

pub use context::RequestContext;
pub use notification::{
    CreateNotification, DispatchOutcome, NotificationDispatcher, NotificationService,
    RecipientResolver,
};
