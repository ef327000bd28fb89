//! Catalog
//!
//! Read-only product, category and store data behind a price comparison.

use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::{
    ids::{CategoryId, ChainstoreId, ProductId, StoreId},
    products::Product,
};

pub mod categories;
pub mod directory;
pub mod memory;
pub mod search;

pub use categories::{Category, CategoryRecord, build_category_tree, find_category};
pub use directory::{Chainstore, GeoPoint, Store, StoreFilter};
pub use memory::InMemoryCatalog;
pub use search::{MAX_SEARCH_RESULTS, ProductQuery, search_products};

/// Catalog Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// No category with this id
    #[error("Category not found: {0}")]
    UnknownCategory(CategoryId),

    /// No chainstore with this id
    #[error("Chainstore not found: {0}")]
    UnknownChainstore(ChainstoreId),

    /// No store with this id
    #[error("Store not found: {0}")]
    UnknownStore(StoreId),

    /// No product with this id
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    /// Two records share an id
    #[error("Duplicate {kind} id: {id}")]
    Duplicate {
        /// Record kind
        kind: &'static str,
        /// Repeated id
        id: String,
    },
}

/// Browsing and lookup operations of a product catalog.
#[cfg_attr(test, automock)]
pub trait Catalog {
    /// Every category, as a forest.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the categories cannot be read.
    fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Every chainstore, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the chainstores cannot be read.
    fn chainstores(&self) -> Result<Vec<Chainstore>, CatalogError>;

    /// Stores passing `filter`, ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownChainstore`] if the filter names a
    /// chainstore that does not exist.
    fn stores(&self, filter: &StoreFilter) -> Result<Vec<Store>, CatalogError>;

    /// Products matching `query`, best match first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCategory`] if the query names a category
    /// that does not exist.
    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError>;

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if there is no such product.
    fn product(&self, id: &ProductId) -> Result<Product, CatalogError>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        (**self).categories()
    }

    fn chainstores(&self) -> Result<Vec<Chainstore>, CatalogError> {
        (**self).chainstores()
    }

    fn stores(&self, filter: &StoreFilter) -> Result<Vec<Store>, CatalogError> {
        (**self).stores(filter)
    }

    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        (**self).products(query)
    }

    fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        (**self).product(id)
    }
}
