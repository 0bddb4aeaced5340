use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The one live push token for a user. A fresh registration overwrites the
/// previous row; a token the provider reports dead is removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceToken {
    pub user_id: UserId,
    pub token: String,
    pub registered_at: DateTime<Utc>,
}
