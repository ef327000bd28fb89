//! Crate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError, BasketOutcome, Infeasibility, ShopResponse, StoreGroup},
    catalog::{
        Catalog, CatalogError, Category, Chainstore, InMemoryCatalog, ProductQuery, Store,
        StoreFilter,
    },
    fixtures::{Fixture, FixtureError},
    ids::{BrandId, CategoryId, ChainstoreId, ProductId, StoreId},
    offers::{Offer, OfferResolver, OffersByProduct, RawOffer, ResolverError},
    optimizer::compute_basket,
    preferences::Preference,
    pricing::PricingError,
    products::{Brand, Product},
    receipt::{Receipt, ReceiptError},
    requests::{BasketRequest, RequestError, RequestedItem},
    service::{PriceComparison, ServiceError},
    solvers::{Interrupt, MinimumCostSolver, PriceOrderSolver, Solver, SolverError},
};
