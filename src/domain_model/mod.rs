mod device;
mod notification;
mod relationship;
mod unit;
mod user;

pub use device::*;
pub use notification::*;
pub use relationship::*;
pub use unit::*;
pub use user::*;
