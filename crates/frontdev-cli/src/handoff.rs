//! One-shot completion handoff between the build worker and the main task.
//!
//! The worker holds a [`CompletionToken`] and the main task a
//! [`Completion`]. Completing consumes the token, so the outcome is reported
//! at most once; a token dropped without completing (the worker panicked or
//! was cancelled) surfaces as [`CliError::Worker`] instead of a hang.

use tokio::sync::oneshot;

use crate::error::{CliError, Result};

/// Create a connected token/completion pair.
pub fn completion() -> (CompletionToken, Completion) {
    let (tx, rx) = oneshot::channel();
    (CompletionToken { tx }, Completion { rx })
}

/// Worker side: reports how the work ended.
#[derive(Debug)]
pub struct CompletionToken {
    tx: oneshot::Sender<Result<()>>,
}

impl CompletionToken {
    /// Report the outcome. Returns `false` if nobody is waiting anymore.
    pub fn complete(self, outcome: Result<()>) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

/// Main side: resolves once the worker has completed.
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<Result<()>>,
}

impl Completion {
    /// Wait for the worker's outcome.
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(CliError::Worker(
                "completion token dropped before the work finished".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_ok() {
        let (token, completion) = completion();
        tokio::spawn(async move {
            token.complete(Ok(()));
        });
        assert!(completion.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_complete_with_error() {
        let (token, completion) = completion();
        assert!(token.complete(Err(CliError::Server("bind failed".into()))));
        let err = completion.wait().await.unwrap_err();
        assert_eq!(err.to_string(), "Server error: bind failed");
    }

    #[tokio::test]
    async fn test_dropped_token_is_an_error() {
        let (token, completion) = completion();
        drop(token);
        assert!(matches!(completion.wait().await, Err(CliError::Worker(_))));
    }

    #[tokio::test]
    async fn test_panicking_worker_releases_waiter() {
        let (token, completion) = completion();
        let handle = tokio::spawn(async move {
            let _token = token;
            panic!("worker blew up");
        });
        assert!(handle.await.is_err());
        assert!(matches!(completion.wait().await, Err(CliError::Worker(_))));
    }

    #[tokio::test]
    async fn test_complete_without_waiter() {
        let (token, completion) = completion();
        drop(completion);
        assert!(!token.complete(Ok(())));
    }
}
