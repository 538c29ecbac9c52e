//! Cooperative cancellation for crawls and pagination walks

use crate::{CrawlError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable cancellation handle
///
/// All clones observe the same flag. Once cancelled, a handle stays
/// cancelled.
#[derive(Debug, Clone)]
pub struct Cancellation {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl Cancellation {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Requests cancellation of every operation guarded by this handle
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        while !*receiver.borrow_and_update() {
            if receiver.changed().await.is_err() {
                // Unreachable while this handle holds the sender
                std::future::pending::<()>().await;
            }
        }
    }

    /// Runs `operation` unless cancellation is requested first
    ///
    /// Returns `CrawlError::Cancelled` if the handle is already cancelled or
    /// becomes cancelled while the operation is in flight. The operation's
    /// future is dropped in that case.
    pub async fn guard<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Err(CrawlError::Cancelled),
            result = operation => result,
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}
