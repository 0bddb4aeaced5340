mod logger;

pub use logger::*;
pub use tracing::{debug, error, info, warn};
