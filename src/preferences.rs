//! Shopper preferences and the offer constraint filter

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{ids::StoreId, offers::Offer};

/// Which stores the shopper is willing to visit, and how many of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    /// Stores the shopper allows. Empty means every store is allowed.
    #[serde(rename = "id_stores", default)]
    allowed_stores: FxHashSet<StoreId>,

    /// Maximum number of distinct stores in the final basket.
    max_stores: usize,
}

impl Preference {
    /// Preference allowing every store, visiting at most `max_stores` of them.
    pub fn unrestricted(max_stores: usize) -> Self {
        Self {
            allowed_stores: FxHashSet::default(),
            max_stores,
        }
    }

    /// Preference limited to the given stores.
    pub fn with_stores<I, S>(stores: I, max_stores: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StoreId>,
    {
        Self {
            allowed_stores: stores.into_iter().map(Into::into).collect(),
            max_stores,
        }
    }

    /// Stores the shopper allows (empty = unrestricted).
    pub fn allowed_stores(&self) -> &FxHashSet<StoreId> {
        &self.allowed_stores
    }

    /// The store bound exactly as requested.
    pub fn max_stores(&self) -> usize {
        self.max_stores
    }

    /// Whether an allow-list is in effect.
    pub fn is_restricted(&self) -> bool {
        !self.allowed_stores.is_empty()
    }

    /// Whether offers from `store` may be used.
    pub fn allows(&self, store: &StoreId) -> bool {
        !self.is_restricted() || self.allowed_stores.contains(store)
    }

    /// The store bound the search actually uses.
    ///
    /// A bound larger than the allow-list is clamped down to its size, never
    /// relaxed upward.
    pub fn effective_max_stores(&self) -> usize {
        if self.is_restricted() {
            self.max_stores.min(self.allowed_stores.len())
        } else {
            self.max_stores
        }
    }

    /// Drop every offer from a store outside the allow-list.
    pub fn filter_offers<'a>(&self, offers: Vec<Offer<'a>>) -> Vec<Offer<'a>> {
        if !self.is_restricted() {
            return offers;
        }

        offers
            .into_iter()
            .filter(|offer| self.allows(offer.store()))
            .collect()
    }
}
