use crate::domain_model::UserId;
use crate::domain_port::{DeviceTokenStore, PushMessage, PushOutcome, PushProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct PushRetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
    /// Ceiling for one whole detached dispatch, retries included.
    pub dispatch_timeout: Duration,
}

impl Default for PushRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            dispatch_timeout: Duration::from_secs(10),
        }
    }
}

/// Best-effort delivery to the recipient's current device token. Dispatch
/// never fails from the caller's point of view: a missing token is a normal
/// steady state, a dead token is pruned, and transient provider errors are
/// retried a bounded number of times and then dropped.
pub struct PushDispatcher {
    tokens: Arc<dyn DeviceTokenStore>,
    provider: Arc<dyn PushProvider>,
    policy: PushRetryPolicy,
    cancel: CancellationToken,
}

impl PushDispatcher {
    pub fn new(
        tokens: Arc<dyn DeviceTokenStore>,
        provider: Arc<dyn PushProvider>,
        policy: PushRetryPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            tokens,
            provider,
            policy,
            cancel,
        }
    }

    pub async fn dispatch(&self, recipient: UserId, message: PushMessage) {
        let token = match self.tokens.get(recipient).await {
            Ok(Some(row)) => row.token,
            Ok(None) => {
                tracing::debug!(%recipient, "no device token, skipping push");
                return;
            }
            Err(e) => {
                tracing::warn!(%recipient, "token lookup failed: {e}");
                return;
            }
        };

        for attempt in 0..self.policy.max_attempts {
            match self.provider.send(&token, &message).await {
                PushOutcome::Sent { message_id } => {
                    tracing::debug!(%recipient, %message_id, "push delivered");
                    return;
                }
                PushOutcome::InvalidToken => {
                    tracing::debug!(%recipient, "token rejected by provider, pruning");
                    if let Err(e) = self.tokens.remove(recipient).await {
                        tracing::warn!(%recipient, "token prune failed: {e}");
                    }
                    return;
                }
                PushOutcome::Transient(reason) => {
                    if attempt + 1 == self.policy.max_attempts {
                        tracing::warn!(
                            %recipient,
                            attempts = self.policy.max_attempts,
                            "push abandoned: {reason}"
                        );
                        return;
                    }
                    let backoff = self.policy.base_backoff * 2u32.pow(attempt);
                    tracing::debug!(%recipient, ?backoff, "push retry after: {reason}");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Runs dispatch on its own task with its own timeout so a slow provider
    /// can never delay the business operation that triggered it.
    pub fn dispatch_detached(self: &Arc<Self>, recipient: UserId, message: PushMessage) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = dispatcher.cancel.cancelled() => {
                    tracing::debug!(%recipient, "push cancelled by shutdown");
                }
                result = tokio::time::timeout(
                    dispatcher.policy.dispatch_timeout,
                    dispatcher.dispatch(recipient, message),
                ) => {
                    if result.is_err() {
                        tracing::warn!(%recipient, "push dispatch timed out");
                    }
                }
            }
        });
    }
}
