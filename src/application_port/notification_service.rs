use crate::domain_model::*;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("notification not found")]
    NotFound,
    #[error("notification belongs to another user")]
    NotOwner,
    #[error("store error: {0}")]
    Store(String),
}

/// A live view over one recipient's notification list. Each item is a full
/// newest-first snapshot; the first arrives without waiting for a change.
/// Dropping the feed (or calling `cancel`) releases the underlying store
/// subscription.
pub struct NotificationFeed {
    rx: mpsc::Receiver<Vec<Notification>>,
    cancel: CancellationToken,
}

impl NotificationFeed {
    pub fn new(rx: mpsc::Receiver<Vec<Notification>>, cancel: CancellationToken) -> Self {
        Self { rx, cancel }
    }

    pub async fn next(&mut self) -> Option<Vec<Notification>> {
        self.rx.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait::async_trait]
pub trait NotificationService: Send + Sync {
    /// Pure append. Rejected only for malformed input, never for business or
    /// push-path reasons.
    async fn create_notification(
        &self,
        input: NewNotification,
    ) -> Result<NotificationId, NotificationError>;
    async fn my_notifications(&self, me: UserId) -> Result<Vec<Notification>, NotificationError>;
    async fn observe_my_notifications(
        &self,
        me: UserId,
    ) -> Result<NotificationFeed, NotificationError>;
    /// Idempotent; marking an already-read notification is a no-op success.
    async fn mark_read(&self, me: UserId, id: NotificationId) -> Result<(), NotificationError>;
    async fn mark_all_read(&self, me: UserId) -> Result<(), NotificationError>;
    async fn unread_count(&self, me: UserId) -> Result<usize, NotificationError>;
    async fn delete_notification(
        &self,
        me: UserId,
        id: NotificationId,
    ) -> Result<(), NotificationError>;
}
