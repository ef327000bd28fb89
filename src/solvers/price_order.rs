//! Price-ordered depth-first solver
//!
//! Walks the candidates cheapest first and returns the first complete
//! assignment that fits the store bound. The result is a low-price heuristic,
//! not a certified minimum: a cheaper cover deeper in the order is never
//! reached once a first one is found. See [`MinimumCostSolver`] for an
//! exhaustive alternative.
//!
//! [`MinimumCostSolver`]: crate::solvers::MinimumCostSolver

use crate::solvers::{
    Assignment, Interrupt, SearchObserver, SearchOutcome, SearchSpace, Solver, SolverError,
};

/// First feasible assignment in ascending line-price order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceOrderSolver;

impl Solver for PriceOrderSolver {
    fn name(&self) -> &'static str {
        "price-order"
    }

    fn solve(
        &self,
        space: &SearchSpace<'_>,
        max_stores: usize,
        interrupt: &Interrupt,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, SolverError> {
        interrupt.check()?;

        let mut search = Search {
            space,
            assignment: Assignment::new(space.product_count(), space.store_count()),
            max_stores,
            interrupt,
            observer,
        };

        if search.assignment.is_complete() || search.descend(0, 0)? {
            let selection = search.assignment.to_selection(space.candidates())?;

            return Ok(SearchOutcome::Found(selection));
        }

        Ok(SearchOutcome::Exhausted)
    }
}

struct Search<'r, 's> {
    space: &'r SearchSpace<'s>,
    assignment: Assignment,
    max_stores: usize,
    interrupt: &'r Interrupt,
    observer: &'r mut dyn SearchObserver,
}

impl Search<'_, '_> {
    /// Explore every candidate from `cursor` onwards. Returns `true` as soon
    /// as the assignment is complete; otherwise leaves it exactly as found.
    fn descend(&mut self, cursor: usize, depth: usize) -> Result<bool, SolverError> {
        let space = self.space;

        let Some(horizon) = self.horizon() else {
            return Ok(false);
        };

        for (position, candidate) in space.candidates().iter().enumerate().skip(cursor) {
            // Past the horizon some unassigned product has no candidates left.
            if position > horizon {
                break;
            }

            self.interrupt.check()?;

            if self.assignment.is_assigned(candidate.product) {
                continue;
            }

            if !self.assignment.fits(candidate, self.max_stores) {
                self.observer.on_prune(candidate);
                continue;
            }

            let placement = self.assignment.place(position, candidate)?;
            self.observer.on_place(depth, candidate);

            if self.assignment.is_complete() {
                self.observer.on_complete(self.assignment.cost());
                return Ok(true);
            }

            if self.descend(position + 1, depth + 1)? {
                return Ok(true);
            }

            self.assignment.remove(placement)?;
            self.observer.on_backtrack(candidate);
        }

        Ok(false)
    }

    /// Last position at which every unassigned product still has a candidate.
    ///
    /// `None` when some unassigned product has no candidate at all.
    fn horizon(&self) -> Option<usize> {
        (0..self.space.product_count())
            .filter(|&product| !self.assignment.is_assigned(product))
            .map(|product| self.space.last_position(product))
            .try_fold(usize::MAX, |horizon, last| Some(horizon.min(last?)))
    }
}
