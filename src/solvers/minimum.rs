//! Minimum-cost branch-and-bound solver
//!
//! Explores every complete cover within the store bound and keeps the
//! cheapest. Products with the fewest candidates are branched on first and a
//! branch is cut as soon as its cost plus the cheapest possible completion
//! reaches the best cover found so far.
//!
//! This changes the result compared to [`PriceOrderSolver`] whenever the first
//! feasible cover is not the cheapest one, so it is opt-in.
//!
//! [`PriceOrderSolver`]: crate::solvers::PriceOrderSolver

use smallvec::SmallVec;

use crate::solvers::{
    Assignment, Interrupt, SearchObserver, SearchOutcome, SearchSpace, Solver, SolverError,
};

/// Cheapest assignment within the store bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimumCostSolver;

impl Solver for MinimumCostSolver {
    fn name(&self) -> &'static str {
        "minimum-cost"
    }

    fn solve(
        &self,
        space: &SearchSpace<'_>,
        max_stores: usize,
        interrupt: &Interrupt,
        observer: &mut dyn SearchObserver,
    ) -> Result<SearchOutcome, SolverError> {
        interrupt.check()?;

        if space.uncovered_products().next().is_some() {
            return Ok(SearchOutcome::Exhausted);
        }

        let mut order: SmallVec<[usize; 16]> = (0..space.product_count()).collect();
        order.sort_by_key(|&product| (space.positions_for(product).len(), product));

        // floors[d] = cheapest possible cost of assigning order[d..]
        let mut floors: SmallVec<[i128; 17]> = SmallVec::with_capacity(order.len() + 1);
        floors.push(0);

        for &product in order.iter().rev() {
            let cheapest = space.cheapest_price(product).map_or(0, i128::from);
            let below = floors.last().copied().unwrap_or_default();
            floors.push(below + cheapest);
        }

        floors.reverse();

        let mut bound = Bound {
            space,
            assignment: Assignment::new(space.product_count(), space.store_count()),
            best: None,
            order,
            floors,
            max_stores,
            interrupt,
            observer,
        };

        bound.branch(0)?;

        match bound.best {
            Some(best) => Ok(SearchOutcome::Found(best.to_selection(space.candidates())?)),
            None => Ok(SearchOutcome::Exhausted),
        }
    }
}

struct Bound<'r, 's> {
    space: &'r SearchSpace<'s>,
    assignment: Assignment,
    best: Option<Assignment>,
    order: SmallVec<[usize; 16]>,
    floors: SmallVec<[i128; 17]>,
    max_stores: usize,
    interrupt: &'r Interrupt,
    observer: &'r mut dyn SearchObserver,
}

impl Bound<'_, '_> {
    fn branch(&mut self, depth: usize) -> Result<(), SolverError> {
        let space = self.space;

        let Some(&product) = self.order.get(depth) else {
            self.accept();
            return Ok(());
        };

        let floor = self.floors.get(depth + 1).copied().unwrap_or_default();

        for &position in space.positions_for(product) {
            self.interrupt.check()?;

            let candidate = space.candidate(position).ok_or(SolverError::InvariantViolation {
                message: "candidate position out of range",
            })?;

            let lower_bound = self.assignment.cost() + i128::from(candidate.price) + floor;

            // Candidates are price ordered, so nothing later can do better.
            if self
                .best
                .as_ref()
                .is_some_and(|best| lower_bound >= best.cost())
            {
                break;
            }

            if !self.assignment.fits(candidate, self.max_stores) {
                self.observer.on_prune(candidate);
                continue;
            }

            let placement = self.assignment.place(position, candidate)?;
            self.observer.on_place(depth, candidate);

            self.branch(depth + 1)?;

            self.assignment.remove(placement)?;
            self.observer.on_backtrack(candidate);
        }

        Ok(())
    }

    fn accept(&mut self) {
        let cost = self.assignment.cost();

        if self.best.as_ref().is_none_or(|best| cost < best.cost()) {
            self.observer.on_complete(cost);
            self.best = Some(self.assignment.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::PLN};
    use testresult::TestResult;

    use crate::{
        ids::ProductId,
        offers::{Offer, RawOffer},
        solvers::{NoopObserver, PriceOrderSolver},
    };

    use super::*;

    fn offer(product: &str, store: &str, minor: i64) -> Offer<'static> {
        Offer::new(
            ProductId::from(product),
            RawOffer::new(store, store, Money::from_minor(minor, PLN)),
            1,
            Money::from_minor(minor, PLN),
        )
    }

    fn products(ids: &[&str]) -> Vec<ProductId> {
        ids.iter().map(|id| ProductId::from(*id)).collect()
    }

    #[test]
    fn finds_cheaper_cover_than_price_order() -> TestResult {
        let products = products(&["a", "b", "c"]);
        let offers = [
            offer("a", "s1", 100),
            offer("b", "s2", 100),
            offer("c", "s3", 100),
            offer("a", "s3", 200),
            offer("c", "s1", 10_000),
        ];

        let space = SearchSpace::new(&products, &offers);

        let first = PriceOrderSolver.solve(&space, 2, &Interrupt::none(), &mut NoopObserver)?;
        let minimum = MinimumCostSolver.solve(&space, 2, &Interrupt::none(), &mut NoopObserver)?;

        assert_eq!(first.selection().map(|s| s.cost), Some(10_200));
        assert_eq!(minimum.selection().map(|s| s.cost), Some(400));

        Ok(())
    }

    #[test]
    fn agrees_with_price_order_on_common_store_fallback() -> TestResult {
        let products = products(&["a", "b"]);
        let offers = [
            offer("a", "cheap-a", 100),
            offer("b", "cheap-b", 100),
            offer("a", "common", 500),
            offer("b", "common", 500),
        ];

        let space = SearchSpace::new(&products, &offers);
        let outcome = MinimumCostSolver.solve(&space, 1, &Interrupt::none(), &mut NoopObserver)?;

        assert_eq!(outcome.selection().map(|s| s.cost), Some(1000));

        Ok(())
    }

    #[test]
    fn exhausted_when_store_bound_too_tight() -> TestResult {
        let products = products(&["a", "b"]);
        let offers = [offer("a", "s1", 100), offer("b", "s2", 100)];

        let space = SearchSpace::new(&products, &offers);
        let outcome = MinimumCostSolver.solve(&space, 1, &Interrupt::none(), &mut NoopObserver)?;

        assert_eq!(outcome, SearchOutcome::Exhausted);

        Ok(())
    }

    #[test]
    fn exhausted_when_a_product_has_no_candidates() -> TestResult {
        let products = products(&["a", "b"]);
        let offers = [offer("a", "s1", 100)];

        let space = SearchSpace::new(&products, &offers);
        let outcome = MinimumCostSolver.solve(&space, 3, &Interrupt::none(), &mut NoopObserver)?;

        assert_eq!(outcome, SearchOutcome::Exhausted);

        Ok(())
    }

    #[test]
    fn never_costs_more_than_price_order() -> TestResult {
        let products = products(&["a", "b", "c", "d"]);
        let offers = [
            offer("a", "s1", 120),
            offer("a", "s2", 90),
            offer("a", "s3", 150),
            offer("b", "s1", 300),
            offer("b", "s3", 200),
            offer("c", "s2", 40),
            offer("c", "s3", 60),
            offer("d", "s1", 70),
            offer("d", "s2", 110),
            offer("d", "s3", 65),
        ];

        let space = SearchSpace::new(&products, &offers);

        for max_stores in 1..=3 {
            let first =
                PriceOrderSolver.solve(&space, max_stores, &Interrupt::none(), &mut NoopObserver)?;
            let minimum =
                MinimumCostSolver.solve(&space, max_stores, &Interrupt::none(), &mut NoopObserver)?;

            assert_eq!(
                first.selection().is_some(),
                minimum.selection().is_some(),
                "solvers disagree on feasibility for max_stores={max_stores}"
            );

            if let (Some(first), Some(minimum)) = (first.selection(), minimum.selection()) {
                assert!(
                    minimum.cost <= first.cost,
                    "minimum {} should not exceed first feasible {}",
                    minimum.cost,
                    first.cost
                );
            }
        }

        Ok(())
    }
}
