//! Cancellation context for payroll runs.

use tokio_util::sync::CancellationToken;

use crate::error::{EngineError, EngineResult};

/// Carries the cancellation signal of a payroll run.
///
/// The processor checks it before every record store call; once cancelled,
/// no further reads or writes happen, and payslips written earlier stay as
/// they are.
#[derive(Debug, Clone)]
pub struct RunContext {
    cancel: CancellationToken,
}

impl RunContext {
    /// A context that is never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    /// A context driven by an existing token, e.g. one tied to a request
    /// deadline or server shutdown.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Requests cancellation of the run.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fails with [`EngineError::Cancelled`] once cancellation was requested.
    pub fn ensure_active(&self) -> EngineResult<()> {
        if self.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
