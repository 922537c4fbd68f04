//! Cooperative cancellation for in-flight calls.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::{Error, Result};

/// A cloneable handle that cancels every call it was passed to.
///
/// Cancelling is idempotent. Clones share the same state.
///
/// ```
/// use edugraph_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Cancel every call observing this token.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Completes when the token is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// Fails with [`Error::Cancelled`] if the token is cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Run `future` unless the token fires first.
    pub async fn run_until_cancelled<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Error::Cancelled),
            result = future => result,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Check an optional token.
pub fn check_cancelled(token: Option<&CancellationToken>) -> Result<()> {
    token.map_or(Ok(()), CancellationToken::check)
}

/// Race `future` against an optional token.
pub async fn run_cancellable<F, T>(token: Option<&CancellationToken>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match token {
        Some(token) => token.run_until_cancelled(future).await,
        None => future.await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::new();
        check!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        check!(token.is_cancelled());
        let_assert!(Err(Error::Cancelled) = token.check());
    }

    #[test]
    fn missing_token_never_cancels() {
        check!(check_cancelled(None).is_ok());
    }

    #[tokio::test]
    async fn pre_cancelled_token_skips_future() {
        let token = CancellationToken::new();
        token.cancel();

        let result = token
            .run_until_cancelled(async { Ok::<_, Error>("ran") })
            .await;
        let_assert!(Err(Error::Cancelled) = result);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_pending_future() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = run_cancellable(Some(&token), async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, Error>(())
        })
        .await;
        let_assert!(Err(Error::Cancelled) = result);
    }

    #[tokio::test]
    async fn completes_without_token() {
        let result = run_cancellable(None, async { Ok::<_, Error>(42) }).await;
        let_assert!(Ok(42) = result);
    }
}
