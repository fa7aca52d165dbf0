//! Notification domain entities.

pub mod delivery;
pub mod inbox;
pub mod kind;
pub mod model;
pub mod severity;

pub use delivery::{DeliveryRecord, DeliveryStatus};
pub use inbox::InboxItem;
pub use kind::NotificationType;
pub use model::{NewNotification, Notification, NotificationWithType};
pub use severity::NotificationSeverity;
