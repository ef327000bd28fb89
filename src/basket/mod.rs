//! Basket
//!
//! Turns a solver [`Selection`] into a [`Basket`] grouped by store, or explains
//! why no basket could be built.

use std::collections::BTreeMap;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    ids::{ProductId, StoreId},
    offers::Offer,
    pricing::{PricingError, total_price},
    requests::{BasketRequest, RequestError},
    solvers::{Selection, SolverError},
};

pub mod response;

pub use response::{ShopProduct, ShopResponse, ShopStore};

/// Errors that stop a basket from being computed at all.
///
/// An unfulfillable request is not an error; see [`BasketOutcome::Infeasible`].
#[derive(Debug, Error, PartialEq)]
pub enum BasketError {
    /// The request was rejected before searching.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Offer data could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The search was interrupted or failed internally.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Why a request cannot be fulfilled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Infeasibility {
    /// No store carries these products at all.
    #[error("not available in any store: {}", join_ids(.products))]
    Unavailable {
        /// Products without any offer, in request order
        products: Vec<ProductId>,
    },

    /// These products are only carried by stores outside the allow-list.
    #[error("not available in the preferred stores: {}", join_ids(.products))]
    NotInPreferredStores {
        /// Products without an allowed offer, in request order
        products: Vec<ProductId>,
    },

    /// Every product is offered, but not within the store bound.
    #[error("cannot buy every product in at most {max_stores} store(s)")]
    StoreLimit {
        /// Effective store bound the search ran with
        max_stores: usize,
    },
}

impl Infeasibility {
    /// Work out why a search over `filtered` found nothing.
    ///
    /// `priced` holds every offer before the allow-list was applied. Missing
    /// products take precedence over the allow-list, which takes precedence
    /// over the store bound.
    pub fn diagnose(
        request: &BasketRequest,
        priced: &[Offer<'_>],
        filtered: &[Offer<'_>],
        max_stores: usize,
    ) -> Self {
        let missing_from = |offers: &[Offer<'_>]| -> Vec<ProductId> {
            request
                .items()
                .iter()
                .filter(|item| !offers.iter().any(|offer| offer.product() == &item.product))
                .map(|item| item.product.clone())
                .collect()
        };

        let unavailable = missing_from(priced);

        if !unavailable.is_empty() {
            return Infeasibility::Unavailable {
                products: unavailable,
            };
        }

        let not_preferred = missing_from(filtered);

        if !not_preferred.is_empty() {
            return Infeasibility::NotInPreferredStores {
                products: not_preferred,
            };
        }

        Infeasibility::StoreLimit { max_stores }
    }

    /// Human readable reason, as shown to the shopper.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The offers bought at a single store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup<'a> {
    store: StoreId,
    store_name: String,
    offers: SmallVec<[Offer<'a>; 8]>,
    total: Money<'a, Currency>,
}

impl<'a> StoreGroup<'a> {
    /// Store identifier
    pub fn store(&self) -> &StoreId {
        &self.store
    }

    /// Human readable store name
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Offers bought here, in request order
    pub fn offers(&self) -> &[Offer<'a>] {
        &self.offers
    }

    /// Sum of the line prices at this store
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }
}

/// A fulfilled basket: one offer per requested product, grouped by store.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket<'a> {
    store_groups: SmallVec<[StoreGroup<'a>; 4]>,
    total: Money<'a, Currency>,
    currency: &'a Currency,
}

impl<'a> Basket<'a> {
    /// Build a basket from the offers a solver selected.
    ///
    /// `offers` must be the slice the search space was built from. Groups are
    /// ordered by store id; offers within a group keep request order.
    ///
    /// # Errors
    ///
    /// - [`BasketError::Solver`]: the selection points outside `offers`.
    /// - [`BasketError::Pricing`]: a total could not be summed.
    pub fn from_selection(
        offers: &[Offer<'a>],
        selection: &Selection,
        currency: &'a Currency,
    ) -> Result<Self, BasketError> {
        let mut by_store: BTreeMap<&StoreId, SmallVec<[Offer<'a>; 8]>> = BTreeMap::new();

        for &idx in &selection.offers {
            let offer = offers.get(idx).ok_or(SolverError::InvariantViolation {
                message: "selected offer out of range",
            })?;

            by_store
                .entry(offer.store())
                .or_default()
                .push(offer.clone());
        }

        let store_groups = by_store
            .into_iter()
            .map(|(store, offers)| {
                let total = total_price(&offers)?;
                let store_name = offers
                    .first()
                    .map(|offer| offer.store_name().to_string())
                    .unwrap_or_default();

                Ok(StoreGroup {
                    store: store.clone(),
                    store_name,
                    offers,
                    total,
                })
            })
            .collect::<Result<SmallVec<[StoreGroup<'a>; 4]>, PricingError>>()?;

        let total = store_groups
            .iter()
            .try_fold(Money::from_minor(0, currency), |acc, group| {
                acc.add(group.total)
            })
            .map_err(PricingError::from)?;

        Ok(Basket {
            store_groups,
            total,
            currency,
        })
    }

    /// Store groups, ordered by store id
    pub fn store_groups(&self) -> &[StoreGroup<'a>] {
        &self.store_groups
    }

    /// Sum of every line price in the basket
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Basket currency
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Number of distinct stores visited
    pub fn store_count(&self) -> usize {
        self.store_groups.len()
    }

    /// Every chosen offer, grouped by store
    pub fn offers(&self) -> impl Iterator<Item = &Offer<'a>> {
        self.store_groups
            .iter()
            .flat_map(|group| group.offers.iter())
    }

    /// Number of basket lines
    pub fn len(&self) -> usize {
        self.store_groups
            .iter()
            .map(|group| group.offers.len())
            .sum()
    }

    /// Whether the basket has no lines
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of computing a basket.
#[derive(Debug, Clone, PartialEq)]
pub enum BasketOutcome<'a> {
    /// Every product could be bought within the constraints.
    Fulfilled(Box<Basket<'a>>),

    /// The request cannot be fulfilled.
    Infeasible(Infeasibility),
}

impl<'a> BasketOutcome<'a> {
    /// The basket, if fulfilled.
    pub fn basket(&self) -> Option<&Basket<'a>> {
        match self {
            BasketOutcome::Fulfilled(basket) => Some(basket),
            BasketOutcome::Infeasible(_) => None,
        }
    }

    /// The reason, if infeasible.
    pub fn infeasibility(&self) -> Option<&Infeasibility> {
        match self {
            BasketOutcome::Fulfilled(_) => None,
            BasketOutcome::Infeasible(infeasibility) => Some(infeasibility),
        }
    }

    /// Whether a basket was found.
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, BasketOutcome::Fulfilled(_))
    }
}
