mod device_token_store_memory;
mod notification_store_memory;
mod relationship_store_memory;
mod user_directory_memory;

pub use device_token_store_memory::*;
pub use notification_store_memory::*;
pub use relationship_store_memory::*;
pub use user_directory_memory::*;
