//! User feedback sink
//!
//! The success/warning/danger toasts the UI shows after an action. The sink
//! is a seam: the server logs and stores them, tests capture them in memory.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tb_core::traits::Id;
use tokio::sync::RwLock;

/// Feedback severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    Success,
    Warning,
    Danger,
}

/// One user-facing toast message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub level: FeedbackLevel,
}

impl Feedback {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            level: FeedbackLevel::Success,
        }
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            level: FeedbackLevel::Warning,
        }
    }

    pub fn danger(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: None,
            level: FeedbackLevel::Danger,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Feedback delivery seam
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Deliver a toast to a user. Fire-and-forget: delivery problems are the
    /// sink's to log, never the caller's to handle.
    async fn deliver(&self, recipient_id: Id, feedback: &Feedback);
}

/// Production sink: structured log lines, one per toast.
#[derive(Debug, Default)]
pub struct TracingFeedbackSink;

#[async_trait]
impl FeedbackSink for TracingFeedbackSink {
    async fn deliver(&self, recipient_id: Id, feedback: &Feedback) {
        match feedback.level {
            FeedbackLevel::Success => tracing::info!(
                recipient_id,
                title = %feedback.title,
                body = feedback.body.as_deref().unwrap_or(""),
                "feedback"
            ),
            FeedbackLevel::Warning | FeedbackLevel::Danger => tracing::warn!(
                recipient_id,
                title = %feedback.title,
                body = feedback.body.as_deref().unwrap_or(""),
                "feedback"
            ),
        }
    }
}

/// Test sink capturing everything delivered.
#[derive(Debug, Default)]
pub struct MemoryFeedbackSink {
    delivered: RwLock<Vec<(Id, Feedback)>>,
}

impl MemoryFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn delivered(&self) -> Vec<(Id, Feedback)> {
        self.delivered.read().await.clone()
    }
}

#[async_trait]
impl FeedbackSink for MemoryFeedbackSink {
    async fn deliver(&self, recipient_id: Id, feedback: &Feedback) {
        self.delivered
            .write()
            .await
            .push((recipient_id, feedback.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_builders() {
        let toast = Feedback::danger("Permission Denied")
            .with_body("You do not have permission to move this ticket.");
        assert_eq!(toast.level, FeedbackLevel::Danger);
        assert!(toast.body.is_some());
    }

    #[tokio::test]
    async fn test_memory_sink_captures() {
        let sink = MemoryFeedbackSink::new();
        sink.deliver(1, &Feedback::success("Ticket Updated")).await;

        let delivered = sink.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, 1);
        assert_eq!(delivered[0].1.title, "Ticket Updated");
    }
}
