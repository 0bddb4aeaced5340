mod device_token_registry_impl;
mod event_trigger;
mod notification_service_impl;
mod push_dispatcher;
mod relationship_service_impl;

pub use device_token_registry_impl::*;
pub use event_trigger::*;
pub use notification_service_impl::*;
pub use push_dispatcher::*;
pub use relationship_service_impl::*;
