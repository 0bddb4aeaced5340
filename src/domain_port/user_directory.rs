use crate::application_port::RelationError;
use crate::domain_model::*;

/// Minimal view of the user base this core needs: existence/username lookup
/// for addressing people, and id sampling to seed friend suggestions.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn username(&self, user: UserId) -> Result<String, RelationError>;
    async fn sample_user_ids(&self, limit: usize) -> Result<Vec<UserId>, RelationError>;
}
