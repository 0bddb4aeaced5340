use crate::domain_port::{PushMessage, PushOutcome, PushProvider};
use nanoid::nanoid;
use serde_json::Value;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct SentPush {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: Value,
}

// Scriptable provider for the "fake" backend and for tests. Extend the script
// hooks when more provider behaviors need simulating.
#[derive(Default)]
pub struct FakePushProvider {
    script: Mutex<VecDeque<PushOutcome>>,
    invalid_tokens: Mutex<HashSet<String>>,
    sent: Mutex<Vec<SentPush>>,
    attempts: AtomicU32,
    changed: Notify,
}

impl FakePushProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues outcomes consumed one per send, ahead of the default behavior.
    pub fn script_outcome(&self, outcome: PushOutcome) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
    }

    /// From now on the provider treats this token as unregistered.
    pub fn mark_token_invalid(&self, token: &str) {
        if let Ok(mut invalid) = self.invalid_tokens.lock() {
            invalid.insert(token.to_owned());
        }
    }

    pub fn sent_log(&self) -> Vec<SentPush> {
        self.sent.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Polls until at least `n` send attempts were observed, for tests that
    /// follow a detached dispatch.
    pub async fn wait_for_attempts(&self, n: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.attempts() >= n {
                return true;
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            let _ = tokio::time::timeout(remaining, self.changed.notified()).await;
        }
    }
}

#[async_trait::async_trait]
impl PushProvider for FakePushProvider {
    async fn send(&self, token: &str, message: &PushMessage) -> PushOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        let outcome = match scripted {
            Some(outcome) => outcome,
            None => {
                let dead = self
                    .invalid_tokens
                    .lock()
                    .map(|invalid| invalid.contains(token))
                    .unwrap_or(false);
                if dead {
                    PushOutcome::InvalidToken
                } else {
                    PushOutcome::Sent {
                        message_id: nanoid!(),
                    }
                }
            }
        };

        if matches!(outcome, PushOutcome::Sent { .. }) {
            if let Ok(mut log) = self.sent.lock() {
                log.push(SentPush {
                    token: token.to_owned(),
                    title: message.title.clone(),
                    body: message.body.clone(),
                    data: message.data.clone(),
                });
            }
        }
        self.changed.notify_waiters();
        outcome
    }
}
