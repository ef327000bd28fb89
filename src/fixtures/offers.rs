//! Offer and Category Fixtures

use serde::Deserialize;

use crate::catalog::CategoryRecord;

/// Wrapper for categories in YAML
#[derive(Debug, Deserialize)]
pub struct CategoriesFixture {
    /// Flat category records, in display order
    pub categories: Vec<CategoryRecord>,
}

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Offers, in resolution order
    pub offers: Vec<OfferFixture>,
}

/// Offer Fixture
#[derive(Debug, Deserialize)]
pub struct OfferFixture {
    /// Product id
    pub product: String,

    /// Store id
    pub store: String,

    /// Unit price (e.g., "3.49 PLN")
    pub price: String,

    /// Store's price description
    #[serde(default)]
    pub description: Option<String>,
}
