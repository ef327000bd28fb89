//! Fixtures
//!
//! Loads a catalog, its offers and shopping lists from YAML files laid out as
//! `<base>/<kind>/<name>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::{CatalogError, Chainstore, InMemoryCatalog, Store},
    fixtures::{
        offers::{CategoriesFixture, OffersFixture},
        products::{ProductsFixture, parse_price},
        stores::{ChainstoresFixture, StoresFixture},
    },
    ids::{ChainstoreId, ProductId, StoreId},
    requests::BasketRequest,
};

pub mod offers;
pub mod products;
pub mod stores;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between offers
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No offers loaded yet
    #[error("No offers loaded yet; currency unknown")]
    NoCurrency,

    /// Fixture references data the catalog does not have
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Catalog being populated
    catalog: InMemoryCatalog,

    /// Currency shared by every offer in the set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: InMemoryCatalog::new(),
            currency: None,
        }
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    /// Load categories from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_categories(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CategoriesFixture = serde_norway::from_str(&self.read("categories", name)?)?;

        self.catalog.with_categories(&fixture.categories);

        Ok(self)
    }

    /// Load chainstores from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or repeats an id.
    pub fn load_chainstores(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ChainstoresFixture = serde_norway::from_str(&self.read("chainstores", name)?)?;

        for (id, chainstore) in fixture.chainstores {
            self.catalog.add_chainstore(Chainstore {
                id: ChainstoreId::new(id),
                name: chainstore.name,
            })?;
        }

        Ok(self)
    }

    /// Load stores from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a store
    /// references an unknown chainstore.
    pub fn load_stores(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: StoresFixture = serde_norway::from_str(&self.read("stores", name)?)?;

        for (id, store) in fixture.stores {
            let chainstore_id = ChainstoreId::new(store.chainstore);

            let chainstore = self
                .catalog
                .chainstore(&chainstore_id)
                .cloned()
                .ok_or(CatalogError::UnknownChainstore(chainstore_id))?;

            self.catalog.add_store(Store {
                id: StoreId::new(id),
                chainstore,
                name: store.name,
                city: store.city,
                street: store.street,
                district: store.district,
                region: store.region,
                coordinates: store.coordinates,
            })?;
        }

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or repeats an id.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(&self.read("products", name)?)?;

        for (id, product) in fixture.products {
            self.catalog.add_product(product.into_product(id))?;
        }

        Ok(self)
    }

    /// Load offers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if an offer
    /// references an unknown product or store, or if there are currency
    /// mismatches.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OffersFixture = serde_norway::from_str(&self.read("offers", name)?)?;

        for offer in fixture.offers {
            let (minor_units, currency) = parse_price(&offer.price)?;

            // Every offer in a set shares one currency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.catalog.add_offer(
                &ProductId::new(offer.product),
                &StoreId::new(offer.store),
                Money::from_minor(minor_units, currency),
                offer.description,
            )?;
        }

        Ok(self)
    }

    /// Load a complete fixture set (every kind with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_categories(name)?
            .load_chainstores(name)?
            .load_stores(name)?
            .load_products(name)?
            .load_offers(name)?;

        Ok(fixture)
    }

    /// Load a shopping list, in the shop request format
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or is not a valid request.
    pub fn load_list(&self, name: &str) -> Result<BasketRequest, FixtureError> {
        Ok(serde_norway::from_str(&self.read("lists", name)?)?)
    }

    /// The loaded catalog
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Take the loaded catalog
    pub fn into_catalog(self) -> InMemoryCatalog {
        self.catalog
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no offers have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
