// store contracts

mod device_token_store;
mod notification_store;
mod push_provider;
mod relationship_store;
mod user_directory;

pub use device_token_store::*;
pub use notification_store::*;
pub use push_provider::*;
pub use relationship_store::*;
pub use user_directory::*;
