//! # tb-notifications
//!
//! The per-user notification inbox (list, mark-read bookkeeping) and the
//! feedback sink used for user-facing success/denial toasts.

pub mod feedback;
pub mod inbox;
pub mod notification;

pub use feedback::{Feedback, FeedbackLevel, FeedbackSink, MemoryFeedbackSink, TracingFeedbackSink};
pub use inbox::{
    InboxError, InboxResult, InboxService, MemoryNotificationStore, NotificationStore,
};
pub use notification::Notification;
