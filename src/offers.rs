//! Offers

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::ids::{ProductId, StoreId};

/// Offers keyed by the product they are for, as returned by an [`OfferResolver`].
pub type OffersByProduct<'a> = FxHashMap<ProductId, Vec<RawOffer<'a>>>;

/// A store carrying a product at a unit price, before any quantity is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct RawOffer<'a> {
    /// Store carrying the product
    pub store: StoreId,

    /// Human readable store name
    pub store_name: String,

    /// Price of a single unit
    pub unit_price: Money<'a, Currency>,

    /// Opaque price description (e.g. "3.50 zł / kg"), informational only
    pub price_description: Option<String>,
}

impl<'a> RawOffer<'a> {
    /// Create a new raw offer without a price description.
    pub fn new(
        store: impl Into<StoreId>,
        store_name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            store: store.into(),
            store_name: store_name.into(),
            unit_price,
            price_description: None,
        }
    }

    /// Attach a price description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.price_description = Some(description.into());
        self
    }
}

/// A priced offer for one line of a basket request.
///
/// `line_price` is always `unit_price × quantity`; offers are only built by the
/// pricing normalizer and never change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Offer<'a> {
    product: ProductId,
    store: StoreId,
    store_name: String,
    price_description: Option<String>,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    line_price: Money<'a, Currency>,
}

impl<'a> Offer<'a> {
    pub(crate) fn new(
        product: ProductId,
        raw: RawOffer<'a>,
        quantity: u32,
        line_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            product,
            store: raw.store,
            store_name: raw.store_name,
            price_description: raw.price_description,
            unit_price: raw.unit_price,
            quantity,
            line_price,
        }
    }

    /// Product this offer is for
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Store making the offer
    pub fn store(&self) -> &StoreId {
        &self.store
    }

    /// Human readable store name
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Opaque price description from the resolver
    pub fn price_description(&self) -> Option<&str> {
        self.price_description.as_deref()
    }

    /// Price of a single unit
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Requested quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price for the whole line (unit price × quantity)
    pub fn line_price(&self) -> &Money<'a, Currency> {
        &self.line_price
    }
}

/// Errors raised while resolving offers.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// The product is not known to the resolver at all.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The backing source failed.
    #[error("Offer source failed: {0}")]
    Source(String),
}

/// Supplies the offers available for a product.
///
/// An empty list means no store carries the product; that is a normal answer
/// and must not be reported as an error.
#[cfg_attr(test, automock)]
pub trait OfferResolver {
    /// Return every known offer for `product`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolverError`] if the offers could not be looked up.
    fn offers(&self, product: &ProductId) -> Result<Vec<RawOffer<'static>>, ResolverError>;
}

impl<T: OfferResolver + ?Sized> OfferResolver for &T {
    fn offers(&self, product: &ProductId) -> Result<Vec<RawOffer<'static>>, ResolverError> {
        (**self).offers(product)
    }
}
