use crate::application_impl::PushDispatcher;
use crate::application_port::{NotificationError, NotificationService};
use crate::domain_model::*;
use crate::domain_port::{PushMessage, UserDirectory};
use serde_json::json;
use std::sync::Arc;

/// Glue between a state transition and the delivery pipeline. Two steps, in
/// order: (1) durable notification write, whose failure surfaces to the caller;
/// (2) detached best-effort push carrying the new notification id. The push
/// outcome has no effect on step 1.
pub struct EventTrigger {
    notifications: Arc<dyn NotificationService>,
    dispatcher: Arc<PushDispatcher>,
    users: Arc<dyn UserDirectory>,
}

impl EventTrigger {
    pub fn new(
        notifications: Arc<dyn NotificationService>,
        dispatcher: Arc<PushDispatcher>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
            users,
        }
    }

    pub async fn on_relationship_event(
        &self,
        kind: NotificationKind,
        recipient: UserId,
        sender: UserId,
    ) -> Result<NotificationId, NotificationError> {
        self.fire(kind, recipient, Some(sender), None).await
    }

    pub async fn on_interaction_event(
        &self,
        kind: NotificationKind,
        recipient: UserId,
        sender: UserId,
        related_item: Option<RelatedItemId>,
    ) -> Result<NotificationId, NotificationError> {
        self.fire(kind, recipient, Some(sender), related_item).await
    }

    async fn fire(
        &self,
        kind: NotificationKind,
        recipient: UserId,
        sender: Option<UserId>,
        related_item: Option<RelatedItemId>,
    ) -> Result<NotificationId, NotificationError> {
        let id = self
            .notifications
            .create_notification(NewNotification {
                recipient,
                sender,
                kind,
                related_item: related_item.clone(),
                priority: priority_for(kind),
            })
            .await?;

        let sender_name = match sender {
            Some(user) => self
                .users
                .username(user)
                .await
                .unwrap_or_else(|_| "Someone".to_owned()),
            None => "Someone".to_owned(),
        };
        let (title, body) = compose(kind, &sender_name);
        let mut data = json!({
            "notificationDocId": id.to_string(),
            "kind": kind,
        });
        if let Some(item) = related_item {
            data["relatedItemId"] = json!(item.0);
        }

        self.dispatcher
            .dispatch_detached(recipient, PushMessage { title, body, data });

        Ok(id)
    }
}

fn priority_for(kind: NotificationKind) -> NotificationPriority {
    match kind {
        NotificationKind::NewMessage => NotificationPriority::High,
        _ => NotificationPriority::Normal,
    }
}

fn compose(kind: NotificationKind, sender_name: &str) -> (String, String) {
    let (title, body) = match kind {
        NotificationKind::FriendRequest => {
            ("Friend request", format!("{sender_name} sent you a friend request"))
        }
        NotificationKind::FriendAccept => {
            ("Request accepted", format!("{sender_name} accepted your friend request"))
        }
        NotificationKind::Like => ("New like", format!("{sender_name} liked your story")),
        NotificationKind::Comment => {
            ("New comment", format!("{sender_name} commented on your story"))
        }
        NotificationKind::NewStory => ("New story", format!("{sender_name} shared a new story")),
        NotificationKind::NewMessage => {
            ("New message", format!("{sender_name} sent you a message"))
        }
    };
    (title.to_owned(), body)
}
