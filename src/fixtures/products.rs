//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, PLN, USD};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    ids::{BrandId, CategoryId, ProductId},
    products::{Brand, Product},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Brand Fixture
#[derive(Debug, Deserialize)]
pub struct BrandFixture {
    /// Brand id
    pub id: String,

    /// Brand name
    pub name: String,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product brand
    pub brand: BrandFixture,

    /// Category id
    pub category: String,

    /// Net weight in grams
    #[serde(default)]
    pub weight: Option<u32>,

    /// Volume in millilitres
    #[serde(default)]
    pub volume: Option<u32>,

    /// Catalog price description
    #[serde(default)]
    pub price_description: Option<String>,

    /// Sold by weight
    #[serde(default)]
    pub decimal_possibility: bool,
}

impl ProductFixture {
    /// Build the catalog product with the given id.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id: ProductId::new(id),
            name: self.name,
            brand: Brand {
                id: BrandId::new(self.brand.id),
                name: self.brand.name,
            },
            category: CategoryId::new(self.category),
            weight: self.weight,
            volume: self.volume,
            price_description: self.price_description,
            decimal_possibility: self.decimal_possibility,
        }
    }
}

/// Parse price string (e.g., "3.49 PLN") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal with no more fractional
/// digits than the currency allows, or if the currency code is not
/// recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "PLN" => PLN,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() || amount.scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
