use crate::application_impl::EventTrigger;
use crate::application_port::{RelationError, RelationshipService};
use crate::domain_model::*;
use crate::domain_port::{EdgeWrite, RelationshipStore, UserDirectory};
use std::collections::HashSet;
use std::sync::Arc;

pub struct RealRelationshipService {
    store: Arc<dyn RelationshipStore>,
    users: Arc<dyn UserDirectory>,
    trigger: Arc<EventTrigger>,
}

impl RealRelationshipService {
    pub fn new(
        store: Arc<dyn RelationshipStore>,
        users: Arc<dyn UserDirectory>,
        trigger: Arc<EventTrigger>,
    ) -> Self {
        Self {
            store,
            users,
            trigger,
        }
    }

    /// One state-machine step: write both edges conditioned on the status just
    /// read. A lost race shows up as `Conflict`; the caller re-reads, never
    /// blind-retries.
    async fn transition(
        &self,
        me: UserId,
        target: UserId,
        expected: RelationshipStatus,
        mine: RelationshipStatus,
    ) -> Result<(), RelationError> {
        match self
            .store
            .write_edge_pair(me, target, mine, mine.complement(), expected)
            .await?
        {
            EdgeWrite::Applied => Ok(()),
            EdgeWrite::Conflict => Err(RelationError::Conflict),
        }
    }

    fn ensure_distinct(me: UserId, target: UserId) -> Result<(), RelationError> {
        if me == target {
            return Err(RelationError::Validation(
                "cannot target yourself".to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RelationshipService for RealRelationshipService {
    async fn send_request(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        self.users.username(target).await?;

        let mine = self.store.read_edge(me, target).await?;
        match mine {
            RelationshipStatus::None => {}
            RelationshipStatus::Blocking => return Err(RelationError::Permission),
            // The other side placed a block; a generic error keeps it silent.
            RelationshipStatus::Blocked => {
                return Err(RelationError::Validation(
                    "friend request not allowed".to_owned(),
                ));
            }
            RelationshipStatus::PendingOutgoing | RelationshipStatus::PendingIncoming => {
                return Err(RelationError::Validation(
                    "a request is already pending".to_owned(),
                ));
            }
            RelationshipStatus::Friends => {
                return Err(RelationError::Validation("already friends".to_owned()));
            }
        }

        self.transition(
            me,
            target,
            RelationshipStatus::None,
            RelationshipStatus::PendingOutgoing,
        )
        .await?;

        self.trigger
            .on_relationship_event(NotificationKind::FriendRequest, target, me)
            .await
            .map_err(|e| RelationError::Store(e.to_string()))?;
        Ok(())
    }

    async fn cancel_request(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        let mine = self.store.read_edge(me, target).await?;
        if mine != RelationshipStatus::PendingOutgoing {
            return Err(RelationError::Validation(
                "no outgoing request to cancel".to_owned(),
            ));
        }
        self.transition(
            me,
            target,
            RelationshipStatus::PendingOutgoing,
            RelationshipStatus::None,
        )
        .await
    }

    async fn accept_request(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        let mine = self.store.read_edge(me, target).await?;
        if mine != RelationshipStatus::PendingIncoming {
            return Err(RelationError::Validation(
                "no incoming request to accept".to_owned(),
            ));
        }
        self.transition(
            me,
            target,
            RelationshipStatus::PendingIncoming,
            RelationshipStatus::Friends,
        )
        .await?;

        // Notify the original requester.
        self.trigger
            .on_relationship_event(NotificationKind::FriendAccept, target, me)
            .await
            .map_err(|e| RelationError::Store(e.to_string()))?;
        Ok(())
    }

    async fn decline_request(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        let mine = self.store.read_edge(me, target).await?;
        if mine != RelationshipStatus::PendingIncoming {
            return Err(RelationError::Validation(
                "no incoming request to decline".to_owned(),
            ));
        }
        self.transition(
            me,
            target,
            RelationshipStatus::PendingIncoming,
            RelationshipStatus::None,
        )
        .await
    }

    async fn block_user(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        let mine = self.store.read_edge(me, target).await?;
        if mine == RelationshipStatus::Blocking {
            return Ok(());
        }
        // Overwrites any friendship or pending request on both sides. Silent:
        // the target is never notified.
        self.transition(me, target, mine, RelationshipStatus::Blocking)
            .await
    }

    async fn unblock_user(&self, me: UserId, target: UserId) -> Result<(), RelationError> {
        Self::ensure_distinct(me, target)?;
        let mine = self.store.read_edge(me, target).await?;
        if mine != RelationshipStatus::Blocking {
            return Err(RelationError::Validation(
                "user is not blocked".to_owned(),
            ));
        }
        // Does not restore whatever stood before the block.
        self.transition(
            me,
            target,
            RelationshipStatus::Blocking,
            RelationshipStatus::None,
        )
        .await
    }

    async fn relationship_status(
        &self,
        me: UserId,
        target: UserId,
    ) -> Result<RelationshipStatus, RelationError> {
        self.store.read_edge(me, target).await
    }

    async fn list_friends(&self, me: UserId) -> Result<Vec<FriendSummary>, RelationError> {
        let edges = self
            .store
            .list_edges(me, Some(RelationshipStatus::Friends))
            .await?;
        let mut out = Vec::with_capacity(edges.len());
        for edge in edges {
            let username = self.users.username(edge.other).await?;
            out.push(FriendSummary {
                user_id: edge.other,
                username,
                since: edge.updated_at,
            });
        }
        Ok(out)
    }

    async fn list_friend_requests(
        &self,
        me: UserId,
    ) -> Result<Vec<FriendRequestSummary>, RelationError> {
        let edges = self
            .store
            .list_edges(me, Some(RelationshipStatus::PendingIncoming))
            .await?;
        let mut out = Vec::with_capacity(edges.len());
        for edge in edges {
            let username = self.users.username(edge.other).await?;
            out.push(FriendRequestSummary {
                user_id: edge.other,
                username,
                requested_at: edge.requested_at,
            });
        }
        Ok(out)
    }

    async fn friend_suggestions(
        &self,
        me: UserId,
        limit: PageSize,
    ) -> Result<Vec<UserSummary>, RelationError> {
        let limit = limit.0 as usize;
        let edges = self.store.list_edges(me, None).await?;
        // Any live edge disqualifies: friends, pending either way, blocks in
        // either direction. A past decline resets to None and stays eligible.
        let related: HashSet<UserId> = edges.iter().map(|e| e.other).collect();

        let candidates = self
            .users
            .sample_user_ids(limit + related.len() + 1)
            .await?;
        let mut out = Vec::new();
        for user_id in candidates {
            if out.len() == limit {
                break;
            }
            if user_id == me || related.contains(&user_id) {
                continue;
            }
            let username = self.users.username(user_id).await?;
            out.push(UserSummary { user_id, username });
        }
        Ok(out)
    }
}
