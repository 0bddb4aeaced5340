use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_push::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub relationship_service: Arc<dyn RelationshipService>,
    pub notification_service: Arc<dyn NotificationService>,
    pub device_token_registry: Arc<dyn DeviceTokenRegistry>,
    pub event_trigger: Arc<EventTrigger>,
    pub user_directory: Arc<MemoryUserDirectory>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let cancel = CancellationToken::new();

        let relationship_store: Arc<dyn RelationshipStore> =
            Arc::new(MemoryRelationshipStore::new());
        let notification_store: Arc<dyn NotificationStore> =
            Arc::new(MemoryNotificationStore::new());
        let device_token_store: Arc<dyn DeviceTokenStore> =
            Arc::new(MemoryDeviceTokenStore::new());
        let user_directory = Arc::new(MemoryUserDirectory::new());

        let push_provider: Arc<dyn PushProvider> = match settings.push.backend.as_str() {
            "fake" => Arc::new(FakePushProvider::new()),
            other => return Err(anyhow::anyhow!("Unknown push backend: {}", other)),
        };

        let policy = PushRetryPolicy {
            max_attempts: settings.push.max_attempts,
            base_backoff: Duration::from_millis(settings.push.base_backoff_ms),
            dispatch_timeout: Duration::from_millis(settings.push.dispatch_timeout_ms),
        };
        let dispatcher = Arc::new(PushDispatcher::new(
            device_token_store.clone(),
            push_provider,
            policy,
            cancel.clone(),
        ));

        let notification_service: Arc<dyn NotificationService> =
            Arc::new(RealNotificationService::new(notification_store));

        let event_trigger = Arc::new(EventTrigger::new(
            notification_service.clone(),
            dispatcher,
            user_directory.clone(),
        ));

        let relationship_service: Arc<dyn RelationshipService> =
            Arc::new(RealRelationshipService::new(
                relationship_store,
                user_directory.clone(),
                event_trigger.clone(),
            ));

        let device_token_registry: Arc<dyn DeviceTokenRegistry> =
            Arc::new(RealDeviceTokenRegistry::new(device_token_store));

        info!("server started");

        Ok(Self {
            relationship_service,
            notification_service,
            device_token_registry,
            event_trigger,
            user_directory,
            cancel,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        // Drops in-flight push tasks; notification writes are already durable.
        self.cancel.cancel();
    }
}
