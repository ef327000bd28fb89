//! Basket search solvers
//!
//! A solver receives a [`SearchSpace`] (the filtered offers of one request,
//! sorted by line price) and a store bound, and either selects exactly one
//! offer per requested product or reports that the space is exhausted.

use smallvec::SmallVec;
use thiserror::Error;

pub mod assignment;
pub mod interrupt;
pub mod minimum;
pub mod observer;
pub mod price_order;
pub mod space;

pub use assignment::Assignment;
pub use interrupt::Interrupt;
pub use minimum::MinimumCostSolver;
pub use observer::{NoopObserver, SearchObserver, SearchStats};
pub use price_order::PriceOrderSolver;
pub use space::{Candidate, SearchSpace};

/// Solver Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// The caller cancelled the search.
    #[error("search was cancelled")]
    Cancelled,

    /// The search ran past its deadline.
    #[error("search deadline exceeded")]
    DeadlineExceeded,

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// The offers chosen by a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Offer index (into the offers the space was built from) for each
    /// requested product, in request order.
    pub offers: SmallVec<[usize; 16]>,

    /// Sum of the chosen line prices, in minor units.
    pub cost: i128,
}

/// Result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every product was assigned within the store bound.
    Found(Selection),

    /// No assignment satisfies the store bound.
    Exhausted,
}

impl SearchOutcome {
    /// The selection, if the search succeeded.
    pub fn selection(&self) -> Option<&Selection> {
        match self {
            SearchOutcome::Found(selection) => Some(selection),
            SearchOutcome::Exhausted => None,
        }
    }
}

/// Trait for searching a basket assignment
pub trait Solver {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Search `space` for an assignment that uses at most `max_stores` stores.
    ///
    /// The interrupt is checked before every candidate is examined.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the search is interrupted or an internal
    /// invariant is violated.
    fn solve(
        &self,
        space: &SearchSpace<'_>,
        max_stores: usize,
        interrupt: &Interrupt,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, SolverError>;
}
