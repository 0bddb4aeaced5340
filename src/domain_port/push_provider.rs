use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub enum PushOutcome {
    Sent { message_id: String },
    /// The token is dead or unregistered; the caller should prune it.
    InvalidToken,
    /// Provider temporarily unavailable; the caller may retry.
    Transient(String),
}

/// External push provider boundary. Transport failures are folded into
/// `Transient` so the outcome enum is the whole contract.
#[async_trait::async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, token: &str, message: &PushMessage) -> PushOutcome;
}
