use crate::domain_model::UserId;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("empty token")]
    EmptyToken,
    #[error("store error: {0}")]
    Store(String),
}

/// Per-user registration of the current push token, last-registered wins.
#[async_trait::async_trait]
pub trait DeviceTokenRegistry: Send + Sync {
    async fn register_token(&self, user: UserId, token: &str) -> Result<(), DeviceError>;
    /// Used on logout, and by the push path when the provider proves the token
    /// dead. Removing an absent token is a no-op success.
    async fn remove_token(&self, user: UserId) -> Result<(), DeviceError>;
}
