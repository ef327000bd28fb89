//! Basket requests

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ids::ProductId, preferences::Preference};

/// Reasons a basket request is rejected before any search happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The shopping list is empty.
    #[error("at least one product must be added")]
    NoItems,

    /// A requested quantity is zero.
    #[error("quantity for product {0} must be at least 1")]
    ZeroQuantity(ProductId),

    /// The same product appears more than once.
    #[error("product {0} is requested more than once")]
    DuplicateProduct(ProductId),

    /// The store bound is zero.
    #[error("max_stores must be at least 1")]
    ZeroMaxStores,
}

/// One line of a shopping list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    /// Product to buy
    #[serde(rename = "id_product")]
    pub product: ProductId,

    /// How many units to buy
    #[serde(rename = "count", default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl RequestedItem {
    /// Create a new requested item.
    pub fn new(product: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}

/// A validated shopping request.
///
/// Construction (including deserialization) rejects empty lists, zero
/// quantities, duplicate products and a zero store bound.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedBasketRequest")]
pub struct BasketRequest {
    #[serde(rename = "products")]
    items: Vec<RequestedItem>,

    #[serde(rename = "user_preference")]
    preference: Preference,
}

#[derive(Deserialize)]
struct UncheckedBasketRequest {
    products: Vec<RequestedItem>,
    user_preference: Preference,
}

impl TryFrom<UncheckedBasketRequest> for BasketRequest {
    type Error = RequestError;

    fn try_from(unchecked: UncheckedBasketRequest) -> Result<Self, Self::Error> {
        Self::new(unchecked.products, unchecked.user_preference)
    }
}

impl BasketRequest {
    /// Create a validated basket request.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if the request is invalid.
    pub fn new(
        items: impl IntoIterator<Item = RequestedItem>,
        preference: Preference,
    ) -> Result<Self, RequestError> {
        let items: Vec<RequestedItem> = items.into_iter().collect();

        if items.is_empty() {
            return Err(RequestError::NoItems);
        }

        if preference.max_stores() == 0 {
            return Err(RequestError::ZeroMaxStores);
        }

        let mut seen = FxHashSet::default();

        for item in &items {
            if item.quantity == 0 {
                return Err(RequestError::ZeroQuantity(item.product.clone()));
            }

            if !seen.insert(&item.product) {
                return Err(RequestError::DuplicateProduct(item.product.clone()));
            }
        }

        Ok(Self { items, preference })
    }

    /// Requested items, in request order.
    pub fn items(&self) -> &[RequestedItem] {
        &self.items
    }

    /// Shopper preference.
    pub fn preference(&self) -> &Preference {
        &self.preference
    }

    /// Number of requested items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a validated request; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
