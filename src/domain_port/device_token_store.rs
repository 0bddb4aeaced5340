use crate::application_port::DeviceError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait DeviceTokenStore: Send + Sync {
    /// Overwrites any existing row for the user.
    async fn put(&self, token: DeviceToken) -> Result<(), DeviceError>;
    async fn get(&self, user: UserId) -> Result<Option<DeviceToken>, DeviceError>;
    async fn remove(&self, user: UserId) -> Result<(), DeviceError>;
}
