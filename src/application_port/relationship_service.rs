use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("invalid transition: {0}")]
    Validation(String),
    #[error("concurrent transition conflict")]
    Conflict,
    #[error("user not found")]
    UserNotFound,
    #[error("operation not permitted")]
    Permission,
    #[error("store error: {0}")]
    Store(String),
}

/// The friend/block state machine over pairs of directed edges. Every mutation
/// updates both edges of the pair as one unit, conditioned on the actor's
/// current edge status; a failed precondition is `Conflict` and the caller must
/// re-read before retrying.
#[async_trait::async_trait]
pub trait RelationshipService: Send + Sync {
    async fn send_request(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn cancel_request(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn accept_request(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn decline_request(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn block_user(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn unblock_user(&self, me: UserId, target: UserId) -> Result<(), RelationError>;
    async fn relationship_status(
        &self,
        me: UserId,
        target: UserId,
    ) -> Result<RelationshipStatus, RelationError>;
    async fn list_friends(&self, me: UserId) -> Result<Vec<FriendSummary>, RelationError>;
    async fn list_friend_requests(
        &self,
        me: UserId,
    ) -> Result<Vec<FriendRequestSummary>, RelationError>;
    async fn friend_suggestions(
        &self,
        me: UserId,
        limit: PageSize,
    ) -> Result<Vec<UserSummary>, RelationError>;
}
