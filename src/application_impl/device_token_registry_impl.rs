use crate::application_port::{DeviceError, DeviceTokenRegistry};
use crate::domain_model::*;
use crate::domain_port::DeviceTokenStore;
use chrono::Utc;
use std::sync::Arc;

pub struct RealDeviceTokenRegistry {
    store: Arc<dyn DeviceTokenStore>,
}

impl RealDeviceTokenRegistry {
    pub fn new(store: Arc<dyn DeviceTokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl DeviceTokenRegistry for RealDeviceTokenRegistry {
    async fn register_token(&self, user: UserId, token: &str) -> Result<(), DeviceError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DeviceError::EmptyToken);
        }
        self.store
            .put(DeviceToken {
                user_id: user,
                token: token.to_owned(),
                registered_at: Utc::now(),
            })
            .await
    }

    async fn remove_token(&self, user: UserId) -> Result<(), DeviceError> {
        self.store.remove(user).await
    }
}
