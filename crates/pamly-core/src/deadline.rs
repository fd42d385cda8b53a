// ── Polling deadline ──
//
// Every polling loop in this crate is gated by a `Deadline`: an optional
// wall-clock limit combined with a cancellation token the caller can
// trip at any time. Loops `select!` on `expired()` against their tick.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Caller-supplied bound on how long a polling operation may run.
#[derive(Debug, Clone)]
pub struct Deadline {
    cancel: CancellationToken,
    at: Option<Instant>,
}

impl Deadline {
    /// Expire `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            at: Some(Instant::now() + timeout),
        }
    }

    /// Expire only when `cancel` is cancelled.
    pub fn from_token(cancel: CancellationToken) -> Self {
        Self { cancel, at: None }
    }

    /// Also expire `timeout` from now (the earlier limit wins).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let at = Instant::now() + timeout;
        self.at = Some(self.at.map_or(at, |current| current.min(at)));
        self
    }

    /// Token that expires this deadline when cancelled.
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the deadline has already passed or been cancelled.
    pub fn is_expired(&self) -> bool {
        self.cancel.is_cancelled() || self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Completes once the deadline passes or the token is cancelled.
    pub async fn expired(&self) {
        match self.at {
            Some(at) => {
                tokio::select! {
                    biased;
                    () = self.cancel.cancelled() => {}
                    () = tokio::time::sleep_until(at) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}
