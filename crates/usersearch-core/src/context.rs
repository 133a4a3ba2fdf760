//! Request-scoped context threaded through every adapter and coordinator call.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{CoreError, CoreResult};

/// ## Summary
/// Carries the request id, an optional deadline and a cooperative
/// cancellation flag.
///
/// Clones share the cancellation flag, so cancelling any clone cancels the
/// whole request, including work already handed to blocking tasks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: uuid::Uuid,
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::now_v7(),
            deadline: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// ## Summary
    /// Returns a copy of this context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn request_id(&self) -> uuid::Uuid {
        self.request_id
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when no deadline is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// ## Summary
    /// Fails when the request was cancelled or its deadline has passed.
    ///
    /// ## Errors
    /// Returns `CoreError::Cancelled` or `CoreError::DeadlineExceeded`.
    pub fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(CoreError::DeadlineExceeded);
        }
        Ok(())
    }

    /// ## Summary
    /// Returns a guard that cancels this context when dropped.
    ///
    /// HTTP handlers hold the guard for the lifetime of the request future;
    /// if the client disconnects the future is dropped and in-flight batch
    /// work stops issuing writes.
    #[must_use]
    pub fn cancel_on_drop(&self) -> CancelOnDrop {
        CancelOnDrop {
            ctx: self.clone(),
            armed: true,
        }
    }
}

/// Guard returned by [`RequestContext::cancel_on_drop`].
#[derive(Debug)]
pub struct CancelOnDrop {
    ctx: RequestContext,
    armed: bool,
}

impl CancelOnDrop {
    /// Marks the request as finished so dropping the guard is a no-op.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.ctx.cancel();
        }
    }
}
