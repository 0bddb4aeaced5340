use crate::application_port::NotificationError;
use crate::domain_model::*;
use crate::domain_port::NotificationStore;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::broadcast;

const SIGNAL_CAP: usize = 32;

#[derive(Default)]
pub struct MemoryNotificationStore {
    records: DashMap<NotificationId, Notification>,
    // append order per recipient; newest-first views reverse it
    by_recipient: DashMap<UserId, Vec<NotificationId>>,
    last_created: DashMap<UserId, DateTime<Utc>>,
    signals: DashMap<UserId, broadcast::Sender<()>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, recipient: UserId) {
        if let Some(sender) = self.signals.get(&recipient) {
            let _ = sender.send(());
        }
    }

    /// Wall clocks can stand still between appends; nudge forward so the
    /// per-recipient ordering stays strictly monotonic.
    fn monotonic_now(&self, recipient: UserId) -> DateTime<Utc> {
        let mut last = self.last_created.entry(recipient).or_insert(DateTime::UNIX_EPOCH);
        let mut now = Utc::now();
        if now <= *last {
            now = *last + Duration::microseconds(1);
        }
        *last = now;
        now
    }
}

#[async_trait::async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn append(&self, input: NewNotification) -> Result<Notification, NotificationError> {
        let record = Notification {
            id: NotificationId(uuid::Uuid::new_v4()),
            recipient: input.recipient,
            sender: input.sender,
            kind: input.kind,
            related_item: input.related_item,
            priority: input.priority,
            created_at: self.monotonic_now(input.recipient),
            is_read: false,
        };
        self.records.insert(record.id, record.clone());
        self.by_recipient
            .entry(record.recipient)
            .or_default()
            .push(record.id);
        self.notify(record.recipient);
        Ok(record)
    }

    async fn get(&self, id: NotificationId) -> Result<Notification, NotificationError> {
        self.records
            .get(&id)
            .map(|r| r.clone())
            .ok_or(NotificationError::NotFound)
    }

    async fn list_by_recipient(
        &self,
        recipient: UserId,
    ) -> Result<Vec<Notification>, NotificationError> {
        let ids = match self.by_recipient.get(&recipient) {
            Some(ids) => ids.clone(),
            None => return Ok(Vec::new()),
        };
        let mut out: Vec<Notification> = ids
            .iter()
            .rev()
            .filter_map(|id| self.records.get(id).map(|r| r.clone()))
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn set_read_flag(
        &self,
        id: NotificationId,
        value: bool,
    ) -> Result<(), NotificationError> {
        let recipient = match self.records.get_mut(&id) {
            Some(mut record) => {
                record.is_read = value;
                record.recipient
            }
            None => return Err(NotificationError::NotFound),
        };
        self.notify(recipient);
        Ok(())
    }

    async fn delete(&self, id: NotificationId) -> Result<(), NotificationError> {
        let (_, record) = self
            .records
            .remove(&id)
            .ok_or(NotificationError::NotFound)?;
        if let Some(mut ids) = self.by_recipient.get_mut(&record.recipient) {
            ids.retain(|kept| *kept != id);
        }
        self.notify(record.recipient);
        Ok(())
    }

    async fn subscribe(
        &self,
        recipient: UserId,
    ) -> Result<broadcast::Receiver<()>, NotificationError> {
        let sender = self
            .signals
            .entry(recipient)
            .or_insert_with(|| broadcast::channel(SIGNAL_CAP).0);
        Ok(sender.subscribe())
    }
}
