#![allow(dead_code)]

use mutuals::application_impl::*;
use mutuals::application_port::*;
use mutuals::domain_model::UserId;
use mutuals::domain_port::*;
use mutuals::infra_memory::*;
use mutuals::infra_push::*;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Harness {
    pub relationships: Arc<dyn RelationshipService>,
    pub notifications: Arc<dyn NotificationService>,
    pub devices: Arc<dyn DeviceTokenRegistry>,
    pub trigger: Arc<EventTrigger>,
    pub dispatcher: Arc<PushDispatcher>,
    pub provider: Arc<FakePushProvider>,
    pub directory: Arc<MemoryUserDirectory>,
    pub edge_store: Arc<dyn RelationshipStore>,
    pub cancel: CancellationToken,
}

pub fn harness() -> Harness {
    harness_with(Arc::new(MemoryRelationshipStore::new()))
}

/// Builds the full wiring over a caller-supplied edge store, so tests can
/// interpose on the store seam.
pub fn harness_with(edge_store: Arc<dyn RelationshipStore>) -> Harness {
    let notification_store: Arc<dyn NotificationStore> = Arc::new(MemoryNotificationStore::new());
    let device_token_store: Arc<dyn DeviceTokenStore> = Arc::new(MemoryDeviceTokenStore::new());
    let directory = Arc::new(MemoryUserDirectory::new());
    let provider = Arc::new(FakePushProvider::new());
    let cancel = CancellationToken::new();

    let dispatcher = Arc::new(PushDispatcher::new(
        device_token_store.clone(),
        provider.clone(),
        PushRetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(10),
            dispatch_timeout: Duration::from_secs(2),
        },
        cancel.clone(),
    ));

    let notifications: Arc<dyn NotificationService> =
        Arc::new(RealNotificationService::new(notification_store));
    let trigger = Arc::new(EventTrigger::new(
        notifications.clone(),
        dispatcher.clone(),
        directory.clone(),
    ));
    let relationships: Arc<dyn RelationshipService> = Arc::new(RealRelationshipService::new(
        edge_store.clone(),
        directory.clone(),
        trigger.clone(),
    ));
    let devices: Arc<dyn DeviceTokenRegistry> =
        Arc::new(RealDeviceTokenRegistry::new(device_token_store));

    Harness {
        relationships,
        notifications,
        devices,
        trigger,
        dispatcher,
        provider,
        directory,
        edge_store,
        cancel,
    }
}

impl Harness {
    pub fn user(&self, name: &str) -> UserId {
        self.directory.add_by_name(name)
    }
}
