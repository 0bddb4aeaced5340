use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's directed view of another. `Blocking` means the owner placed the
/// block; `Blocked` means the other side did.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    None,
    PendingOutgoing,
    PendingIncoming,
    Friends,
    Blocked,
    Blocking,
}

impl RelationshipStatus {
    /// The status the opposite edge must hold at rest. The four valid pairs:
    /// None/None, PendingOutgoing/PendingIncoming, Friends/Friends,
    /// Blocking/Blocked.
    pub fn complement(self) -> RelationshipStatus {
        match self {
            RelationshipStatus::None => RelationshipStatus::None,
            RelationshipStatus::PendingOutgoing => RelationshipStatus::PendingIncoming,
            RelationshipStatus::PendingIncoming => RelationshipStatus::PendingOutgoing,
            RelationshipStatus::Friends => RelationshipStatus::Friends,
            RelationshipStatus::Blocked => RelationshipStatus::Blocking,
            RelationshipStatus::Blocking => RelationshipStatus::Blocked,
        }
    }

    pub fn is_block(self) -> bool {
        matches!(
            self,
            RelationshipStatus::Blocked | RelationshipStatus::Blocking
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RelationshipEdge {
    pub owner: UserId,
    pub other: UserId,
    pub status: RelationshipStatus,
    pub requested_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendSummary {
    pub user_id: UserId,
    pub username: String,
    pub since: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestSummary {
    pub user_id: UserId,
    pub username: String,
    pub requested_at: Option<DateTime<Utc>>,
}
