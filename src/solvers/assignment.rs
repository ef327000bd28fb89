//! Partial assignment state shared by the solvers
//!
//! Every placement returns a [`Placement`] token which the caller hands back
//! to [`Assignment::remove`] when the branch is abandoned, so each stack frame
//! undoes exactly what it did.

use smallvec::{SmallVec, smallvec};

use crate::solvers::{Selection, SolverError, space::Candidate};

/// Proof that a candidate was placed; consumed by [`Assignment::remove`].
#[derive(Debug)]
#[must_use = "a placement must be removed when its branch is abandoned"]
pub struct Placement {
    product: usize,
    store: usize,
    price: i64,
}

/// A partial assignment of candidates to products.
#[derive(Debug, Clone)]
pub struct Assignment {
    chosen: SmallVec<[Option<usize>; 16]>,
    store_load: SmallVec<[usize; 16]>,
    assigned: usize,
    stores_used: usize,
    cost: i128,
}

impl Assignment {
    /// Create an empty assignment for `products` products across `stores` stores.
    pub fn new(products: usize, stores: usize) -> Self {
        Self {
            chosen: smallvec![None; products],
            store_load: smallvec![0; stores],
            assigned: 0,
            stores_used: 0,
            cost: 0,
        }
    }

    /// Whether a product already has an offer.
    pub fn is_assigned(&self, product: usize) -> bool {
        matches!(self.chosen.get(product), Some(Some(_)))
    }

    /// Whether placing an offer at `store` would add a new store to the basket.
    pub fn opens_store(&self, store: usize) -> bool {
        self.store_load.get(store).is_none_or(|load| *load == 0)
    }

    /// Number of distinct stores in use.
    pub fn stores_used(&self) -> usize {
        self.stores_used
    }

    /// Whether placing `candidate` keeps the basket within `max_stores` stores.
    pub fn fits(&self, candidate: &Candidate<'_>, max_stores: usize) -> bool {
        !self.opens_store(candidate.store) || self.stores_used < max_stores
    }

    /// Whether every product has an offer.
    pub fn is_complete(&self) -> bool {
        self.assigned == self.chosen.len()
    }

    /// Sum of placed line prices, in minor units.
    pub fn cost(&self) -> i128 {
        self.cost
    }

    /// Place the candidate found at `position` in exploration order.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if the product is already
    /// assigned or the indexes are out of range.
    pub fn place(
        &mut self,
        position: usize,
        candidate: &Candidate<'_>,
    ) -> Result<Placement, SolverError> {
        let slot = self
            .chosen
            .get_mut(candidate.product)
            .ok_or(SolverError::InvariantViolation {
                message: "candidate product out of range",
            })?;

        if slot.is_some() {
            return Err(SolverError::InvariantViolation {
                message: "product assigned twice",
            });
        }

        let load = self
            .store_load
            .get_mut(candidate.store)
            .ok_or(SolverError::InvariantViolation {
                message: "candidate store out of range",
            })?;

        *slot = Some(position);
        *load += 1;

        if *load == 1 {
            self.stores_used += 1;
        }

        self.assigned += 1;
        self.cost += i128::from(candidate.price);

        Ok(Placement {
            product: candidate.product,
            store: candidate.store,
            price: candidate.price,
        })
    }

    /// Undo a placement.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if the placement does not
    /// match the current state.
    pub fn remove(
        &mut self,
        Placement {
            product,
            store,
            price,
        }: Placement,
    ) -> Result<(), SolverError> {
        let slot = self
            .chosen
            .get_mut(product)
            .filter(|slot| slot.is_some())
            .ok_or(SolverError::InvariantViolation {
                message: "removing a product that is not assigned",
            })?;

        let load = self
            .store_load
            .get_mut(store)
            .filter(|load| **load > 0)
            .ok_or(SolverError::InvariantViolation {
                message: "removing from a store that is not in use",
            })?;

        *slot = None;
        *load -= 1;

        if *load == 0 {
            self.stores_used -= 1;
        }

        self.assigned -= 1;
        self.cost -= i128::from(price);

        Ok(())
    }

    /// Freeze a complete assignment into a [`Selection`] of offer indexes.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if the assignment is
    /// incomplete or refers to unknown candidates.
    pub fn to_selection(&self, candidates: &[Candidate<'_>]) -> Result<Selection, SolverError> {
        let offers = self
            .chosen
            .iter()
            .map(|position| {
                position
                    .and_then(|position| candidates.get(position))
                    .map(|candidate| candidate.offer)
                    .ok_or(SolverError::InvariantViolation {
                        message: "selection built from an incomplete assignment",
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Selection {
            offers,
            cost: self.cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::ids::{ProductId, StoreId};

    use super::*;

    fn candidate<'s>(
        product: usize,
        store: usize,
        price: i64,
        ids: &'s (ProductId, StoreId),
    ) -> Candidate<'s> {
        Candidate {
            offer: product * 10 + store,
            product,
            store,
            price,
            store_id: &ids.1,
            product_id: &ids.0,
        }
    }

    #[test]
    fn place_and_remove_restore_state() -> TestResult {
        let ids = (ProductId::from("p"), StoreId::from("s"));
        let mut assignment = Assignment::new(2, 2);

        let first = assignment.place(0, &candidate(0, 1, 150, &ids))?;

        assert!(assignment.is_assigned(0));
        assert!(!assignment.opens_store(1));
        assert_eq!(assignment.stores_used(), 1);
        assert_eq!(assignment.cost(), 150);

        assignment.remove(first)?;

        assert!(!assignment.is_assigned(0));
        assert!(assignment.opens_store(1));
        assert_eq!(assignment.stores_used(), 0);
        assert_eq!(assignment.cost(), 0);

        Ok(())
    }

    #[test]
    fn shared_store_counts_once() -> TestResult {
        let ids = (ProductId::from("p"), StoreId::from("s"));
        let mut assignment = Assignment::new(2, 1);

        let first = assignment.place(0, &candidate(0, 0, 100, &ids))?;
        let second = assignment.place(1, &candidate(1, 0, 100, &ids))?;

        assert_eq!(assignment.stores_used(), 1);
        assert!(assignment.is_complete());

        assignment.remove(second)?;

        assert_eq!(assignment.stores_used(), 1);

        assignment.remove(first)?;

        assert_eq!(assignment.stores_used(), 0);

        Ok(())
    }

    #[test]
    fn fits_respects_store_bound() -> TestResult {
        let ids = (ProductId::from("p"), StoreId::from("s"));
        let mut assignment = Assignment::new(2, 2);

        let _placement = assignment.place(0, &candidate(0, 0, 100, &ids))?;

        assert!(assignment.fits(&candidate(1, 0, 100, &ids), 1));
        assert!(!assignment.fits(&candidate(1, 1, 100, &ids), 1));
        assert!(assignment.fits(&candidate(1, 1, 100, &ids), 2));

        Ok(())
    }

    #[test]
    fn placing_a_product_twice_is_an_invariant_violation() -> TestResult {
        let ids = (ProductId::from("p"), StoreId::from("s"));
        let mut assignment = Assignment::new(1, 2);

        let _placement = assignment.place(0, &candidate(0, 0, 100, &ids))?;
        let result = assignment.place(1, &candidate(0, 1, 100, &ids));

        assert!(matches!(
            result,
            Err(SolverError::InvariantViolation { .. })
        ));

        Ok(())
    }

    #[test]
    fn selection_requires_complete_assignment() -> TestResult {
        let ids = (ProductId::from("p"), StoreId::from("s"));
        let candidates = [candidate(0, 0, 100, &ids), candidate(1, 0, 200, &ids)];
        let mut assignment = Assignment::new(2, 1);

        let _placement = assignment.place(0, candidates.first().ok_or("missing")?)?;

        assert!(assignment.to_selection(&candidates).is_err());

        let _placement = assignment.place(1, candidates.get(1).ok_or("missing")?)?;
        let selection = assignment.to_selection(&candidates)?;

        assert_eq!(selection.offers.as_slice(), &[0, 10]);
        assert_eq!(selection.cost, 300);

        Ok(())
    }
}
