//! Search Observer

use crate::solvers::space::Candidate;

/// Observer trait for following a search as it runs.
///
/// Callbacks fire as the solver places, prunes and withdraws candidates.
/// Observers are passive: they cannot influence the search.
pub trait SearchObserver {
    /// Called when a candidate is tentatively placed at `depth`.
    fn on_place(&mut self, _depth: usize, _candidate: &Candidate<'_>) {}

    /// Called when a candidate is skipped because it would exceed the store bound.
    fn on_prune(&mut self, _candidate: &Candidate<'_>) {}

    /// Called when a placed candidate is withdrawn because its branch failed.
    fn on_backtrack(&mut self, _candidate: &Candidate<'_>) {}

    /// Called for every complete assignment the solver accepts.
    fn on_complete(&mut self, _cost: i128) {}
}

/// Observer that ignores every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Observer counting search activity, used for diagnostics and logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidates placed
    pub placements: usize,

    /// Candidates skipped by the store bound
    pub prunes: usize,

    /// Placements withdrawn
    pub backtracks: usize,

    /// Complete assignments accepted
    pub completions: usize,

    /// Deepest placement depth reached
    pub max_depth: usize,
}

impl SearchObserver for SearchStats {
    fn on_place(&mut self, depth: usize, _candidate: &Candidate<'_>) {
        self.placements += 1;
        self.max_depth = self.max_depth.max(depth + 1);
    }

    fn on_prune(&mut self, _candidate: &Candidate<'_>) {
        self.prunes += 1;
    }

    fn on_backtrack(&mut self, _candidate: &Candidate<'_>) {
        self.backtracks += 1;
    }

    fn on_complete(&mut self, _cost: i128) {
        self.completions += 1;
    }
}
