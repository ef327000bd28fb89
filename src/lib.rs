//! Best price basket optimizer
//!
//! `bestprice` answers one question for a shopping list: where should each
//! product be bought so that the whole list costs as little as possible,
//! visiting no more stores than the shopper is willing to and only the stores
//! they prefer.
//!
//! The core is [`optimizer::compute_basket`], which prices the offers of every
//! requested product, drops stores outside the shopper's allow-list, searches
//! for an assignment with a [`solvers::Solver`] and groups the result into a
//! [`basket::Basket`] per store. Around it sit an in-memory
//! [`catalog::Catalog`] of categories, stores and products, YAML
//! [`fixtures`] to fill it, and the [`service::PriceComparison`] facade used by
//! the `bestprice` binary.

pub mod basket;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod ids;
pub mod observability;
pub mod offers;
pub mod optimizer;
pub mod preferences;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod requests;
pub mod service;
pub mod solvers;
