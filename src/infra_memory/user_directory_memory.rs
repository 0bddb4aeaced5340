use crate::application_port::RelationError;
use crate::domain_model::*;
use crate::domain_port::UserDirectory;
use dashmap::DashMap;
use std::sync::Mutex;

/// Registration-ordered directory; sampling returns the earliest-registered
/// users first, which keeps suggestion output deterministic.
#[derive(Default)]
pub struct MemoryUserDirectory {
    usernames: DashMap<UserId, String>,
    order: Mutex<Vec<UserId>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: UserId, username: &str) {
        if self.usernames.insert(user, username.to_owned()).is_none() {
            if let Ok(mut order) = self.order.lock() {
                order.push(user);
            }
        }
    }

    /// Derives a stable id from the username, handy for demos and tests.
    pub fn add_by_name(&self, username: &str) -> UserId {
        let user = UserId(uuid::Uuid::new_v5(
            &uuid::Uuid::NAMESPACE_OID,
            username.as_bytes(),
        ));
        self.add_user(user, username);
        user
    }
}

#[async_trait::async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn username(&self, user: UserId) -> Result<String, RelationError> {
        self.usernames
            .get(&user)
            .map(|name| name.clone())
            .ok_or(RelationError::UserNotFound)
    }

    async fn sample_user_ids(&self, limit: usize) -> Result<Vec<UserId>, RelationError> {
        let order = self
            .order
            .lock()
            .map_err(|_| RelationError::Store("user directory lock poisoned".to_owned()))?;
        Ok(order.iter().take(limit).copied().collect())
    }
}
