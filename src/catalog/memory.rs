//! In-memory catalog

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;

use crate::{
    catalog::{
        Catalog, CatalogError, Category, CategoryRecord, Chainstore, ProductQuery, Store,
        StoreFilter, build_category_tree, find_category, search_products,
    },
    ids::{ChainstoreId, ProductId, StoreId},
    offers::{OfferResolver, RawOffer, ResolverError},
    products::{Product, ProductKey},
};

/// Catalog and offer source held entirely in memory.
///
/// Built once, then only read.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    /// Category forest
    categories: Vec<Category>,

    chainstores: FxHashMap<ChainstoreId, Chainstore>,
    stores: FxHashMap<StoreId, Store>,

    /// `SlotMap` holding the products, with id -> key lookups
    products: SlotMap<ProductKey, Product>,
    product_keys: FxHashMap<ProductId, ProductKey>,

    /// Offers per product, in insertion order
    offers: FxHashMap<ProductKey, Vec<RawOffer<'static>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the category tree with one built from `records`.
    pub fn with_categories(&mut self, records: &[CategoryRecord]) -> &mut Self {
        self.categories = build_category_tree(records);
        self
    }

    /// Add a chainstore.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] if the id is already used.
    pub fn add_chainstore(&mut self, chainstore: Chainstore) -> Result<&mut Self, CatalogError> {
        if self.chainstores.contains_key(&chainstore.id) {
            return Err(CatalogError::Duplicate {
                kind: "chainstore",
                id: chainstore.id.to_string(),
            });
        }

        self.chainstores.insert(chainstore.id.clone(), chainstore);

        Ok(self)
    }

    /// Add a store. Its chainstore must already be known.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownChainstore`]: the chainstore was never added.
    /// - [`CatalogError::Duplicate`]: the store id is already used.
    pub fn add_store(&mut self, store: Store) -> Result<&mut Self, CatalogError> {
        if !self.chainstores.contains_key(&store.chainstore.id) {
            return Err(CatalogError::UnknownChainstore(store.chainstore.id));
        }

        if self.stores.contains_key(&store.id) {
            return Err(CatalogError::Duplicate {
                kind: "store",
                id: store.id.to_string(),
            });
        }

        self.stores.insert(store.id.clone(), store);

        Ok(self)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Duplicate`] if the id is already used.
    pub fn add_product(&mut self, product: Product) -> Result<&mut Self, CatalogError> {
        if self.product_keys.contains_key(&product.id) {
            return Err(CatalogError::Duplicate {
                kind: "product",
                id: product.id.to_string(),
            });
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.product_keys.insert(id, key);

        Ok(self)
    }

    /// Record that `store` sells `product` at `unit_price`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] or [`CatalogError::UnknownStore`]
    /// if either was never added.
    pub fn add_offer(
        &mut self,
        product: &ProductId,
        store: &StoreId,
        unit_price: Money<'static, Currency>,
        price_description: Option<String>,
    ) -> Result<&mut Self, CatalogError> {
        let key = self.product_key(product)?;

        let store = self
            .stores
            .get(store)
            .ok_or_else(|| CatalogError::UnknownStore(store.clone()))?;

        let mut offer = RawOffer::new(store.id.clone(), store.display_name(), unit_price);
        offer.price_description = price_description;

        self.offers.entry(key).or_default().push(offer);

        Ok(self)
    }

    /// Look up a chainstore.
    pub fn chainstore(&self, id: &ChainstoreId) -> Option<&Chainstore> {
        self.chainstores.get(id)
    }

    /// Look up a store.
    pub fn store(&self, id: &StoreId) -> Option<&Store> {
        self.stores.get(id)
    }

    /// Number of products
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of stores
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }

    /// Number of offers across every product
    pub fn offer_count(&self) -> usize {
        self.offers.values().map(Vec::len).sum()
    }

    fn product_key(&self, id: &ProductId) -> Result<ProductKey, CatalogError> {
        self.product_keys
            .get(id)
            .copied()
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }
}

impl Catalog for InMemoryCatalog {
    fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.categories.clone())
    }

    fn chainstores(&self) -> Result<Vec<Chainstore>, CatalogError> {
        let mut chainstores: Vec<Chainstore> = self.chainstores.values().cloned().collect();

        chainstores.sort_by(|a, b| (&a.name, &a.id).cmp(&(&b.name, &b.id)));

        Ok(chainstores)
    }

    fn stores(&self, filter: &StoreFilter) -> Result<Vec<Store>, CatalogError> {
        if let Some(chainstore) = &filter.chainstore
            && !self.chainstores.contains_key(chainstore)
        {
            return Err(CatalogError::UnknownChainstore(chainstore.clone()));
        }

        let mut stores: Vec<(String, &Store)> = self
            .stores
            .values()
            .filter(|store| filter.matches(store))
            .map(|store| (store.display_name(), store))
            .collect();

        stores.sort_by(|(a_name, a), (b_name, b)| (a_name, &a.id).cmp(&(b_name, &b.id)));

        Ok(stores.into_iter().map(|(_, store)| store.clone()).collect())
    }

    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, CatalogError> {
        let scope = match &query.category {
            Some(id) => Some(
                find_category(&self.categories, id)
                    .ok_or_else(|| CatalogError::UnknownCategory(id.clone()))?
                    .descendant_ids(),
            ),
            None => None,
        };

        let found = search_products(
            self.products.values(),
            |category| scope.as_ref().is_none_or(|ids| ids.contains(category)),
            &query.phrase,
        );

        Ok(found.into_iter().cloned().collect())
    }

    fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let key = self.product_key(id)?;

        self.products
            .get(key)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))
    }
}

impl OfferResolver for InMemoryCatalog {
    fn offers(&self, product: &ProductId) -> Result<Vec<RawOffer<'static>>, ResolverError> {
        let key = self
            .product_keys
            .get(product)
            .ok_or_else(|| ResolverError::UnknownProduct(product.clone()))?;

        Ok(self.offers.get(key).cloned().unwrap_or_default())
    }
}
