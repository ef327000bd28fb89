//! Search Space

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    ids::{ProductId, StoreId},
    offers::Offer,
};

/// One offer as seen by the search: dense product/store indexes plus the
/// line price in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'s> {
    /// Index of the offer in the slice the space was built from
    pub offer: usize,

    /// Index of the product in request order
    pub product: usize,

    /// Dense store index
    pub store: usize,

    /// Line price in minor units
    pub price: i64,

    /// Store identifier, used for tie-breaking
    pub store_id: &'s StoreId,

    /// Product identifier, used for tie-breaking
    pub product_id: &'s ProductId,
}

impl Candidate<'_> {
    fn exploration_order(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| self.store_id.cmp(other.store_id))
            .then_with(|| self.product_id.cmp(other.product_id))
            .then_with(|| self.offer.cmp(&other.offer))
    }
}

/// Immutable, price-sorted view over the offers of one request.
#[derive(Debug, Clone)]
pub struct SearchSpace<'s> {
    products: SmallVec<[&'s ProductId; 16]>,
    stores: SmallVec<[&'s StoreId; 16]>,
    candidates: Vec<Candidate<'s>>,
    by_product: SmallVec<[SmallVec<[usize; 8]>; 16]>,
}

impl<'s> SearchSpace<'s> {
    /// Build the search space for `products` (in request order) from priced offers.
    ///
    /// Offers for products that are not requested are ignored. Candidates are
    /// sorted ascending by line price, ties broken by store id then product id.
    pub fn new(products: &'s [ProductId], offers: &'s [Offer<'_>]) -> Self {
        let product_index: FxHashMap<&ProductId, usize> = products
            .iter()
            .enumerate()
            .map(|(idx, product)| (product, idx))
            .collect();

        let mut store_index: FxHashMap<&StoreId, usize> = FxHashMap::default();
        let mut stores: SmallVec<[&'s StoreId; 16]> = SmallVec::new();
        let mut candidates = Vec::with_capacity(offers.len());

        for (offer_idx, offer) in offers.iter().enumerate() {
            let Some(&product) = product_index.get(offer.product()) else {
                continue;
            };

            let store = *store_index.entry(offer.store()).or_insert_with(|| {
                stores.push(offer.store());
                stores.len() - 1
            });

            candidates.push(Candidate {
                offer: offer_idx,
                product,
                store,
                price: offer.line_price().to_minor_units(),
                store_id: offer.store(),
                product_id: offer.product(),
            });
        }

        candidates.sort_by(Candidate::exploration_order);

        let mut by_product: SmallVec<[SmallVec<[usize; 8]>; 16]> =
            (0..products.len()).map(|_| SmallVec::new()).collect();

        for (position, candidate) in candidates.iter().enumerate() {
            if let Some(list) = by_product.get_mut(candidate.product) {
                list.push(position);
            }
        }

        Self {
            products: products.iter().collect(),
            stores,
            candidates,
            by_product,
        }
    }

    /// Candidates in exploration order.
    pub fn candidates(&self) -> &[Candidate<'s>] {
        &self.candidates
    }

    /// Candidate at a position in exploration order.
    pub fn candidate(&self, position: usize) -> Option<&Candidate<'s>> {
        self.candidates.get(position)
    }

    /// Positions (in exploration order) of every candidate for a product.
    pub fn positions_for(&self, product: usize) -> &[usize] {
        self.by_product
            .get(product)
            .map(SmallVec::as_slice)
            .unwrap_or_default()
    }

    /// Number of requested products.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of distinct stores with at least one candidate.
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Requested products that have no candidate at all.
    pub fn uncovered_products(&self) -> impl Iterator<Item = &'s ProductId> + '_ {
        self.products
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.positions_for(*idx).is_empty())
            .map(|(_, product)| *product)
    }

    /// Position of the last candidate for a product, if it has any.
    pub fn last_position(&self, product: usize) -> Option<usize> {
        self.positions_for(product).last().copied()
    }

    /// Cheapest line price for a product, if it has any candidate.
    pub fn cheapest_price(&self, product: usize) -> Option<i64> {
        self.positions_for(product)
            .first()
            .and_then(|&position| self.candidate(position))
            .map(|candidate| candidate.price)
    }
}
