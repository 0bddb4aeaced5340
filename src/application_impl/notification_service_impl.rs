use crate::application_port::{NotificationError, NotificationFeed, NotificationService};
use crate::domain_model::*;
use crate::domain_port::NotificationStore;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

pub struct RealNotificationService {
    store: Arc<dyn NotificationStore>,
}

impl RealNotificationService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Ownership gate shared by read/delete paths.
    async fn owned(
        &self,
        me: UserId,
        id: NotificationId,
    ) -> Result<Notification, NotificationError> {
        let record = self.store.get(id).await?;
        if record.recipient != me {
            return Err(NotificationError::NotOwner);
        }
        Ok(record)
    }
}

#[async_trait::async_trait]
impl NotificationService for RealNotificationService {
    async fn create_notification(
        &self,
        input: NewNotification,
    ) -> Result<NotificationId, NotificationError> {
        if input.recipient.0.is_nil() {
            return Err(NotificationError::Malformed("nil recipient".to_owned()));
        }
        if input.sender == Some(input.recipient) {
            return Err(NotificationError::Malformed(
                "sender equals recipient".to_owned(),
            ));
        }
        let record = self.store.append(input).await?;
        Ok(record.id)
    }

    async fn my_notifications(&self, me: UserId) -> Result<Vec<Notification>, NotificationError> {
        self.store.list_by_recipient(me).await
    }

    async fn observe_my_notifications(
        &self,
        me: UserId,
    ) -> Result<NotificationFeed, NotificationError> {
        let mut changes = self.store.subscribe(me).await?;
        let (tx, rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let child = cancel.clone();
        let store = self.store.clone();

        tokio::spawn(async move {
            let initial = store.list_by_recipient(me).await.unwrap_or_default();
            if tx.send(initial).await.is_err() {
                return;
            }
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    tick = changes.recv() => {
                        match tick {
                            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => {
                                let snapshot = match store.list_by_recipient(me).await {
                                    Ok(list) => list,
                                    Err(e) => {
                                        tracing::warn!(%me, "notification snapshot: {e}");
                                        continue;
                                    }
                                };
                                if tx.send(snapshot).await.is_err() {
                                    break;
                                }
                            }
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                }
            }
        });

        Ok(NotificationFeed::new(rx, cancel))
    }

    async fn mark_read(&self, me: UserId, id: NotificationId) -> Result<(), NotificationError> {
        let record = self.owned(me, id).await?;
        if record.is_read {
            return Ok(());
        }
        self.store.set_read_flag(id, true).await
    }

    async fn mark_all_read(&self, me: UserId) -> Result<(), NotificationError> {
        for record in self.store.list_by_recipient(me).await? {
            if !record.is_read {
                self.store.set_read_flag(record.id, true).await?;
            }
        }
        Ok(())
    }

    async fn unread_count(&self, me: UserId) -> Result<usize, NotificationError> {
        let list = self.store.list_by_recipient(me).await?;
        Ok(list.iter().filter(|n| !n.is_read).count())
    }

    async fn delete_notification(
        &self,
        me: UserId,
        id: NotificationId,
    ) -> Result<(), NotificationError> {
        self.owned(me, id).await?;
        self.store.delete(id).await
    }
}
