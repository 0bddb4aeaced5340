use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::{EdgeWrite, RelationshipStore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Both directions of one unordered pair, stored as a single record so the
/// two-edge write is indivisible. `min_status` is the min user's edge toward
/// the max user.
#[derive(Debug, Clone, Copy)]
struct PairRecord {
    min_status: RelationshipStatus,
    max_status: RelationshipStatus,
    requested_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl PairRecord {
    fn side(&self, pair: UserPair, owner: UserId) -> RelationshipStatus {
        if owner == pair.min() {
            self.min_status
        } else {
            self.max_status
        }
    }
}

#[derive(Default)]
pub struct MemoryRelationshipStore {
    pairs: DashMap<UserPair, PairRecord>,
}

impl MemoryRelationshipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RelationshipStore for MemoryRelationshipStore {
    async fn read_edge(
        &self,
        owner: UserId,
        other: UserId,
    ) -> Result<RelationshipStatus, RelationError> {
        let pair = UserPair::new(owner, other);
        Ok(self
            .pairs
            .get(&pair)
            .map(|record| record.side(pair, owner))
            .unwrap_or(RelationshipStatus::None))
    }

    async fn write_edge_pair(
        &self,
        owner: UserId,
        other: UserId,
        owner_status: RelationshipStatus,
        other_status: RelationshipStatus,
        expected_owner: RelationshipStatus,
    ) -> Result<EdgeWrite, RelationError> {
        let pair = UserPair::new(owner, other);
        let now = Utc::now();

        // The entry guard serializes writers on the pair; both sides change
        // under the same lock or not at all.
        let mut entry = self.pairs.entry(pair).or_insert(PairRecord {
            min_status: RelationshipStatus::None,
            max_status: RelationshipStatus::None,
            requested_at: None,
            updated_at: now,
        });

        if entry.side(pair, owner) != expected_owner {
            return Ok(EdgeWrite::Conflict);
        }

        if owner == pair.min() {
            entry.min_status = owner_status;
            entry.max_status = other_status;
        } else {
            entry.max_status = owner_status;
            entry.min_status = other_status;
        }
        entry.requested_at = match owner_status {
            RelationshipStatus::PendingOutgoing | RelationshipStatus::PendingIncoming => Some(now),
            RelationshipStatus::None => None,
            _ => entry.requested_at,
        };
        entry.updated_at = now;

        Ok(EdgeWrite::Applied)
    }

    async fn list_edges(
        &self,
        owner: UserId,
        filter: Option<RelationshipStatus>,
    ) -> Result<Vec<RelationshipEdge>, RelationError> {
        let mut out = Vec::new();
        for item in self.pairs.iter() {
            let pair = *item.key();
            let other = if pair.min() == owner {
                pair.max()
            } else if pair.max() == owner {
                pair.min()
            } else {
                continue;
            };
            let status = item.side(pair, owner);
            if status == RelationshipStatus::None {
                continue;
            }
            if let Some(wanted) = filter {
                if status != wanted {
                    continue;
                }
            }
            out.push(RelationshipEdge {
                owner,
                other,
                status,
                requested_at: item.requested_at,
                updated_at: item.updated_at,
            });
        }
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }
}
