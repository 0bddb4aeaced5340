use crate::application_port::NotificationError;
use crate::domain_model::*;
use tokio::sync::broadcast;

/// Durable per-recipient notification records. Append-only except for the read
/// flag and deletion; per-recipient ordering is by creation time, monotonic.
#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    /// Assigns the id and timestamp; returns the stored record.
    async fn append(&self, input: NewNotification) -> Result<Notification, NotificationError>;
    async fn get(&self, id: NotificationId) -> Result<Notification, NotificationError>;
    /// Newest first.
    async fn list_by_recipient(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, NotificationError>;
    async fn set_read_flag(
        &self,
        id: NotificationId,
        value: bool,
    ) -> Result<(), NotificationError>;
    async fn delete(&self, id: NotificationId) -> Result<(), NotificationError>;

    /// Change signal for one recipient's list: a tick per append, flag change
    /// or delete. Dropping the receiver releases the subscription.
    async fn subscribe(&self, recipient: UserId)
    -> Result<broadcast::Receiver<()>, NotificationError>;
}
