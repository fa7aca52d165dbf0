//! Notification dispatch, recipient resolution, and inbox access.

pub mod dispatcher;
pub mod resolver;
pub mod service;

pub use dispatcher::{CreateNotification, DispatchOutcome, NotificationDispatcher};
pub use resolver::RecipientResolver;
pub use service::NotificationService;
