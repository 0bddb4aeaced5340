use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub uuid::Uuid);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(NotificationId)
    }
}

/// Opaque reference to whatever item the notification points at (a story, a
/// comment thread, a conversation).
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct RelatedItemId(pub String);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccept,
    Like,
    Comment,
    NewStory,
    NewMessage,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub sender: Option<UserId>,
    pub kind: NotificationKind,
    pub related_item: Option<RelatedItemId>,
    pub priority: NotificationPriority,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Everything the caller supplies for a new record; id, timestamp and the read
/// flag are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient: UserId,
    pub sender: Option<UserId>,
    pub kind: NotificationKind,
    pub related_item: Option<RelatedItemId>,
    pub priority: NotificationPriority,
}
