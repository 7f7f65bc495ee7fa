use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use super::ApiError;

/// Cancellation signal and optional deadline threaded through every request
#[derive(Clone, Debug)]
pub struct FetchContext {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every context derived from the one it was created with
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl FetchContext {
    /// Never cancelled, no deadline
    pub fn background() -> Self {
        Self {
            cancel: None,
            deadline: None,
        }
    }

    pub fn with_cancel(self) -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                cancel: Some(receiver),
                ..self
            },
            CancelHandle { sender },
        )
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Keeps the earlier of the current and the new deadline
    pub fn with_deadline(self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|receiver| *receiver.borrow())
    }

    /// Time left before the deadline, `None` when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        if self.remaining().is_some_and(|remaining| remaining.is_zero()) {
            return Err(ApiError::DeadlineExceeded);
        }
        Ok(())
    }

    async fn cancelled(&self) {
        let Some(receiver) = &self.cancel else {
            return std::future::pending().await;
        };
        let mut receiver = receiver.clone();
        let handle_dropped = receiver.wait_for(|cancelled| *cancelled).await.is_err();
        // A dropped handle can no longer cancel
        if handle_dropped {
            std::future::pending::<()>().await;
        }
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Runs `future` until it completes, the context is cancelled or the deadline passes
    pub async fn run<F, T>(&self, future: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ApiError::Cancelled),
            _ = self.expired() => Err(ApiError::DeadlineExceeded),
            result = future => result,
        }
    }
}
