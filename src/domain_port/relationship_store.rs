use crate::application_port::RelationError;
use crate::domain_model::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EdgeWrite {
    Applied,
    /// The owner's edge no longer held the expected status.
    Conflict,
}

/// Durable access to relationship edges, one record per ordered user pair.
/// Absent records read as `None`; pairs are created lazily and never deleted.
#[async_trait::async_trait]
pub trait RelationshipStore: Send + Sync {
    async fn read_edge(
        &self,
        owner: UserId,
        other: UserId,
    ) -> Result<RelationshipStatus, RelationError>;

    /// Writes both directions of the pair as one indivisible unit, conditioned
    /// on `expected_owner` matching the owner's current status. Readers must
    /// never observe one side updated without the other.
    async fn write_edge_pair(
        &self,
        owner: UserId,
        other: UserId,
        owner_status: RelationshipStatus,
        other_status: RelationshipStatus,
        expected_owner: RelationshipStatus,
    ) -> Result<EdgeWrite, RelationError>;

    /// All of the owner's edges, optionally restricted to one status. Edges at
    /// `None` are omitted.
    async fn list_edges(
        &self,
        owner: UserId,
        filter: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEdge>, RelationError>;
}
