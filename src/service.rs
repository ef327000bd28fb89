//! Price comparison service

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::{
    basket::{BasketError, BasketOutcome, ShopResponse},
    catalog::{Catalog, CatalogError, Category, Chainstore, ProductQuery, Store, StoreFilter},
    ids::ProductId,
    offers::{OfferResolver, OffersByProduct, ResolverError},
    optimizer::compute_basket,
    products::Product,
    requests::BasketRequest,
    solvers::{Interrupt, Solver},
};

/// Errors raised by the price comparison service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Offers could not be resolved.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// The basket could not be computed.
    #[error(transparent)]
    Basket(#[from] BasketError),
}

/// Answers catalog queries and shopping requests.
#[derive(Debug, Clone)]
pub struct PriceComparison<C, R> {
    catalog: C,
    resolver: R,
}

impl<C: Catalog, R: OfferResolver> PriceComparison<C, R> {
    /// Create a service over `catalog`, resolving offers through `resolver`.
    pub fn new(catalog: C, resolver: R) -> Self {
        Self { catalog, resolver }
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Every category, as a forest.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Catalog`] if the catalog fails.
    pub fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.catalog.categories()?)
    }

    /// Every chainstore.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Catalog`] if the catalog fails.
    pub fn chainstores(&self) -> Result<Vec<Chainstore>, ServiceError> {
        Ok(self.catalog.chainstores()?)
    }

    /// Stores passing `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Catalog`] if the catalog fails.
    pub fn stores(&self, filter: &StoreFilter) -> Result<Vec<Store>, ServiceError> {
        Ok(self.catalog.stores(filter)?)
    }

    /// Products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Catalog`] if the catalog fails.
    pub fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ServiceError> {
        Ok(self.catalog.products(query)?)
    }

    /// Compute the basket for `request`.
    ///
    /// Products the resolver does not know are treated as carried by no store.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Resolver`]: the offer source failed.
    /// - [`ServiceError::Basket`]: offers could not be priced or the search
    ///   was interrupted.
    #[instrument(skip_all, fields(products = request.len(), solver = solver.name()))]
    pub fn basket(
        &self,
        request: &BasketRequest,
        solver: &dyn Solver,
        interrupt: &Interrupt,
    ) -> Result<BasketOutcome<'static>, ServiceError> {
        let mut offers = OffersByProduct::default();

        for item in request.items() {
            let resolved = match self.resolver.offers(&item.product) {
                Ok(resolved) => resolved,
                Err(ResolverError::UnknownProduct(product)) => {
                    warn!(%product, "requested product is not in the catalog");

                    Vec::new()
                }
                Err(err) => {
                    error!("failed to resolve offers: {err}");

                    return Err(err.into());
                }
            };

            offers.insert(item.product.clone(), resolved);
        }

        compute_basket(request, offers, solver, interrupt).map_err(|err| {
            error!("failed to compute basket: {err}");

            ServiceError::from(err)
        })
    }

    /// Compute the basket for `request` and shape the response payload.
    ///
    /// An unfulfillable request is answered with an error message and no
    /// stores, not with an `Err`.
    ///
    /// # Errors
    ///
    /// Same as [`PriceComparison::basket`], plus [`ServiceError::Catalog`] if
    /// product names cannot be looked up.
    #[instrument(skip_all, fields(products = request.len()))]
    pub fn shop(
        &self,
        request: &BasketRequest,
        solver: &dyn Solver,
        interrupt: &Interrupt,
    ) -> Result<ShopResponse, ServiceError> {
        let outcome = self.basket(request, solver, interrupt)?;
        let products = self.product_details(request)?;

        let response = ShopResponse::from_outcome(&outcome, &products);

        info!(
            fulfilled = response.is_fulfilled(),
            stores = response.stores.len(),
            "shop request answered"
        );

        Ok(response)
    }

    /// Catalog entries for every requested product the catalog knows.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Catalog`] on any failure other than an
    /// unknown product.
    pub fn product_details(
        &self,
        request: &BasketRequest,
    ) -> Result<FxHashMap<ProductId, Product>, ServiceError> {
        let mut products = FxHashMap::default();

        for item in request.items() {
            match self.catalog.product(&item.product) {
                Ok(product) => {
                    products.insert(item.product.clone(), product);
                }
                Err(CatalogError::UnknownProduct(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rusty_money::{Money, iso::PLN};
    use testresult::TestResult;

    use crate::{
        catalog::MockCatalog,
        ids::{BrandId, CategoryId},
        offers::{MockOfferResolver, RawOffer},
        preferences::Preference,
        products::Brand,
        requests::RequestedItem,
        solvers::PriceOrderSolver,
    };

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            brand: Brand {
                id: BrandId::from("b1"),
                name: "Wedel".to_string(),
            },
            category: CategoryId::from("sweets"),
            weight: Some(100),
            volume: None,
            price_description: None,
            decimal_possibility: false,
        }
    }

    fn request(products: &[&str], max_stores: usize) -> TestResult<BasketRequest> {
        Ok(BasketRequest::new(
            products.iter().map(|p| RequestedItem::new(*p, 1)),
            Preference::unrestricted(max_stores),
        )?)
    }

    #[test]
    fn shop_names_products_from_the_catalog() -> TestResult {
        let mut resolver = MockOfferResolver::new();

        resolver
            .expect_offers()
            .with(eq(ProductId::from("chocolate")))
            .times(1)
            .returning(|_| Ok(vec![RawOffer::new("s1", "Lidl", Money::from_minor(649, PLN))]));

        let mut catalog = MockCatalog::new();

        catalog
            .expect_product()
            .returning(|id| Ok(product(id.as_str(), "Czekolada gorzka")));

        let service = PriceComparison::new(catalog, resolver);
        let response = service.shop(
            &request(&["chocolate"], 1)?,
            &PriceOrderSolver,
            &Interrupt::none(),
        )?;

        let store = response.stores.first().ok_or("expected a store")?;
        let line = store.products.first().ok_or("expected a product")?;

        assert!(response.is_fulfilled());
        assert_eq!(store.name, "Lidl");
        assert_eq!(line.product, "Czekolada gorzka");
        assert_eq!(line.brand, "Wedel");
        assert_eq!(line.price.to_string(), "6.49");

        Ok(())
    }

    #[test]
    fn unknown_product_is_reported_as_unavailable() -> TestResult {
        let mut resolver = MockOfferResolver::new();

        resolver
            .expect_offers()
            .returning(|id| Err(ResolverError::UnknownProduct(id.clone())));

        let mut catalog = MockCatalog::new();

        catalog
            .expect_product()
            .returning(|id| Err(CatalogError::UnknownProduct(id.clone())));

        let service = PriceComparison::new(catalog, resolver);
        let response = service.shop(
            &request(&["unicorn"], 1)?,
            &PriceOrderSolver,
            &Interrupt::none(),
        )?;

        assert_eq!(
            response.error.as_deref(),
            Some("not available in any store: unicorn")
        );
        assert!(response.stores.is_empty());

        Ok(())
    }

    #[test]
    fn resolver_failure_is_an_error() -> TestResult {
        let mut resolver = MockOfferResolver::new();

        resolver
            .expect_offers()
            .returning(|_| Err(ResolverError::Source("connection reset".to_string())));

        let service = PriceComparison::new(MockCatalog::new(), resolver);
        let result = service.shop(
            &request(&["chocolate"], 1)?,
            &PriceOrderSolver,
            &Interrupt::none(),
        );

        assert!(matches!(
            result,
            Err(ServiceError::Resolver(ResolverError::Source(_)))
        ));

        Ok(())
    }

    #[test]
    fn catalog_queries_are_delegated() -> TestResult {
        let mut catalog = MockCatalog::new();

        catalog
            .expect_products()
            .withf(|query| query.phrase == "czekolada")
            .returning(|_| Ok(vec![product("chocolate", "Czekolada gorzka")]));

        catalog.expect_chainstores().returning(|| Ok(Vec::new()));

        let service = PriceComparison::new(catalog, MockOfferResolver::new());

        let products = service.products(&ProductQuery::phrase("czekolada"))?;

        assert_eq!(products.len(), 1);
        assert!(service.chainstores()?.is_empty());

        Ok(())
    }
}
