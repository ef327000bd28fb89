//! Shop response payload

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    basket::{Basket, BasketOutcome, StoreGroup},
    ids::{ProductId, StoreId},
    offers::Offer,
    products::Product,
};

/// One bought product in a [`ShopStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProduct {
    /// Product identifier
    #[serde(rename = "id_product")]
    pub id: ProductId,

    /// Product name, or the id when the catalog does not know it
    #[serde(rename = "product_name")]
    pub product: String,

    /// Brand name
    #[serde(rename = "brand_name")]
    pub brand: String,

    /// Requested quantity
    #[serde(rename = "count")]
    pub quantity: u32,

    /// Price of a single unit
    pub unit_price: Decimal,

    /// Price for the whole line
    pub price: Decimal,

    /// Store's price description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_description: Option<String>,
}

/// Everything bought at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStore {
    /// Store identifier
    #[serde(rename = "id_store")]
    pub id: StoreId,

    /// Store display name
    #[serde(rename = "chain_store_name")]
    pub name: String,

    /// Bought products, in request order
    pub products: Vec<ShopProduct>,

    /// Sum of the line prices at this store
    pub price_total: Decimal,
}

/// Response to a shopping request.
///
/// An infeasible request is answered with `error` set and no stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopResponse {
    /// Why the request could not be fulfilled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Stores to visit, ordered by store id
    #[serde(default)]
    pub stores: Vec<ShopStore>,

    /// Sum of every line price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_total: Option<Decimal>,
}

impl ShopResponse {
    /// A response carrying only an error message.
    pub fn error(reason: impl Into<String>) -> Self {
        ShopResponse {
            error: Some(reason.into()),
            ..ShopResponse::default()
        }
    }

    /// Shape a basket outcome, naming products from `products`.
    pub fn from_outcome(
        outcome: &BasketOutcome<'_>,
        products: &FxHashMap<ProductId, Product>,
    ) -> Self {
        match outcome {
            BasketOutcome::Fulfilled(basket) => Self::from_basket(basket, products),
            BasketOutcome::Infeasible(infeasibility) => Self::error(infeasibility.reason()),
        }
    }

    /// Shape a fulfilled basket, naming products from `products`.
    pub fn from_basket(basket: &Basket<'_>, products: &FxHashMap<ProductId, Product>) -> Self {
        ShopResponse {
            error: None,
            stores: basket
                .store_groups()
                .iter()
                .map(|group| shop_store(group, products))
                .collect(),
            price_total: Some(to_decimal(basket.total())),
        }
    }

    /// Whether the request was fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        self.error.is_none()
    }
}

fn shop_store(group: &StoreGroup<'_>, products: &FxHashMap<ProductId, Product>) -> ShopStore {
    ShopStore {
        id: group.store().clone(),
        name: group.store_name().to_string(),
        products: group
            .offers()
            .iter()
            .map(|offer| shop_product(offer, products.get(offer.product())))
            .collect(),
        price_total: to_decimal(group.total()),
    }
}

fn shop_product(offer: &Offer<'_>, product: Option<&Product>) -> ShopProduct {
    ShopProduct {
        id: offer.product().clone(),
        product: product.map_or_else(|| offer.product().to_string(), |p| p.name.clone()),
        brand: product.map(|p| p.brand.name.clone()).unwrap_or_default(),
        quantity: offer.quantity(),
        unit_price: to_decimal(offer.unit_price()),
        price: to_decimal(offer.line_price()),
        price_description: offer.price_description().map(str::to_string),
    }
}

/// Exact decimal value of an amount, e.g. 350 minor PLN becomes `3.50`.
pub fn to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}
