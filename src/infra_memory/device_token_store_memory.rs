use crate::application_port::DeviceError;
use crate::domain_model::*;
use crate::domain_port::DeviceTokenStore;
use dashmap::DashMap;

#[derive(Default)]
pub struct MemoryDeviceTokenStore {
    tokens: DashMap<UserId, DeviceToken>,
}

impl MemoryDeviceTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DeviceTokenStore for MemoryDeviceTokenStore {
    async fn put(&self, token: DeviceToken) -> Result<(), DeviceError> {
        self.tokens.insert(token.user_id, token);
        Ok(())
    }

    async fn get(&self, user: UserId) -> Result<Option<DeviceToken>, DeviceError> {
        Ok(self.tokens.get(&user).map(|row| row.clone()))
    }

    async fn remove(&self, user: UserId) -> Result<(), DeviceError> {
        self.tokens.remove(&user);
        Ok(())
    }
}
