mod device_token_registry;
mod notification_service;
mod relationship_service;

pub use device_token_registry::*;
pub use notification_service::*;
pub use relationship_service::*;
