mod push_provider_fake;

pub use push_provider_fake::*;
