//! Search interruption

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::solvers::SolverError;

/// Deadline and cancellation flag polled by the solvers between steps.
///
/// The default interrupt never fires.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Interrupt {
    /// An interrupt that never fires.
    pub fn none() -> Self {
        Self::default()
    }

    /// Stop the search once `deadline` has passed.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stop the search once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Stop the search once `flag` is set by another thread.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Check whether the search should stop.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Cancelled`] if the cancel flag is set, or
    /// [`SolverError::DeadlineExceeded`] if the deadline has passed.
    pub fn check(&self) -> Result<(), SolverError> {
        if self
            .cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Err(SolverError::Cancelled);
        }

        if self
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(SolverError::DeadlineExceeded);
        }

        Ok(())
    }
}
