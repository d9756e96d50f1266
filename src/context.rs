//! Caller-supplied cancellation and deadlines.
//!
//! A [`RequestContext`] rides along with a [`Client`](crate::Client) handle
//! and guards every point where a call waits on the network: sending the
//! request, reading the body, and reading chunks of a download.

use crate::error::RequestFailure;
use std::future::Future;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline signals applied to requests.
///
/// The default context never cancels and has no deadline; the transport
/// timeout still applies.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancellation: Option<CancellationToken>,
}

impl RequestContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails calls that are still running at `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fails calls once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// The deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Runs `fut` until it finishes, the token fires or the deadline passes.
    ///
    /// A signal that is already raised wins over a future that is ready.
    pub(crate) async fn guard<F, T>(&self, fut: F) -> Result<T, RequestFailure>
    where
        F: Future<Output = Result<T, RequestFailure>>,
    {
        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(RequestFailure::Cancelled),
            _ = expired => Err(RequestFailure::DeadlineExceeded),
            result = fut => result,
        }
    }
}
