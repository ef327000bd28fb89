//! Basket optimizer
//!
//! Runs one request end to end: price the offers, apply the shopper's
//! preferences, search for an assignment and aggregate it into a basket.

use rusty_money::iso::Currency;
use tracing::{debug, info, instrument};

use crate::{
    basket::{Basket, BasketError, BasketOutcome, Infeasibility},
    ids::ProductId,
    offers::{Offer, OffersByProduct},
    pricing::price_offers,
    requests::BasketRequest,
    solvers::{Interrupt, SearchOutcome, SearchSpace, SearchStats, Solver},
};

/// Compute the basket for `request` from the offers of each product.
///
/// Products missing from `offers_by_product`, or mapped to an empty list, are
/// reported as [`Infeasibility::Unavailable`]. Offers for products that were
/// not requested are ignored. The basket currency is the currency of the
/// first offer in request order; every other offer must use it too.
///
/// # Errors
///
/// - [`BasketError::Pricing`]: an offer overflows or uses another currency.
/// - [`BasketError::Solver`]: the search was interrupted.
#[instrument(
    skip_all,
    fields(
        products = request.len(),
        max_stores = request.preference().max_stores(),
        solver = solver.name()
    )
)]
pub fn compute_basket<'a>(
    request: &BasketRequest,
    mut offers_by_product: OffersByProduct<'a>,
    solver: &dyn Solver,
    interrupt: &Interrupt,
) -> Result<BasketOutcome<'a>, BasketError> {
    let preference = request.preference();
    let max_stores = preference.effective_max_stores();

    let Some(currency) = basket_currency(request, &offers_by_product) else {
        let infeasibility = Infeasibility::diagnose(request, &[], &[], max_stores);
        info!(reason = %infeasibility, "no offers for any requested product");

        return Ok(BasketOutcome::Infeasible(infeasibility));
    };

    let mut priced: Vec<Offer<'a>> = Vec::new();

    for item in request.items() {
        let raw = offers_by_product.remove(&item.product).unwrap_or_default();

        priced.extend(price_offers(item, raw, currency)?);
    }

    let filtered = preference.filter_offers(priced.clone());

    debug!(
        priced = priced.len(),
        allowed = filtered.len(),
        currency = currency.iso_alpha_code,
        "offers normalized"
    );

    let products: Vec<ProductId> = request
        .items()
        .iter()
        .map(|item| item.product.clone())
        .collect();

    let space = SearchSpace::new(&products, &filtered);
    let mut stats = SearchStats::default();

    let outcome = solver.solve(&space, max_stores, interrupt, &mut stats)?;

    debug!(
        candidates = space.candidates().len(),
        stores = space.store_count(),
        placements = stats.placements,
        prunes = stats.prunes,
        backtracks = stats.backtracks,
        completions = stats.completions,
        max_depth = stats.max_depth,
        "search finished"
    );

    match outcome {
        SearchOutcome::Found(selection) => {
            let basket = Basket::from_selection(&filtered, &selection, currency)?;

            info!(
                stores = basket.store_count(),
                total = %basket.total(),
                "basket fulfilled"
            );

            Ok(BasketOutcome::Fulfilled(Box::new(basket)))
        }
        SearchOutcome::Exhausted => {
            let infeasibility = Infeasibility::diagnose(request, &priced, &filtered, max_stores);

            info!(reason = %infeasibility, "basket infeasible");

            Ok(BasketOutcome::Infeasible(infeasibility))
        }
    }
}

fn basket_currency<'a>(
    request: &BasketRequest,
    offers_by_product: &OffersByProduct<'a>,
) -> Option<&'a Currency> {
    request
        .items()
        .iter()
        .filter_map(|item| offers_by_product.get(&item.product))
        .flatten()
        .map(|offer| offer.unit_price.currency())
        .next()
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rusty_money::{
        Money,
        iso::{EUR, PLN},
    };
    use testresult::TestResult;

    use crate::{
        basket::StoreGroup,
        ids::StoreId,
        offers::RawOffer,
        preferences::Preference,
        pricing::PricingError,
        requests::RequestedItem,
        solvers::{MinimumCostSolver, PriceOrderSolver, SolverError},
    };

    use super::*;

    fn offers(entries: &[(&str, &str, i64)]) -> OffersByProduct<'static> {
        let mut offers = OffersByProduct::default();

        for &(product, store, minor) in entries {
            offers
                .entry(ProductId::from(product))
                .or_default()
                .push(RawOffer::new(store, store, Money::from_minor(minor, PLN)));
        }

        offers
    }

    fn request(items: &[(&str, u32)], preference: Preference) -> TestResult<BasketRequest> {
        Ok(BasketRequest::new(
            items
                .iter()
                .map(|&(product, quantity)| RequestedItem::new(product, quantity)),
            preference,
        )?)
    }

    #[test]
    fn prices_lines_by_quantity() -> TestResult {
        let request = request(&[("milk", 2)], Preference::unrestricted(1))?;
        let offers = offers(&[("milk", "s1", 350)]);

        let outcome = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none())?;
        let basket = outcome.basket().ok_or("expected a basket")?;

        assert_eq!(basket.total(), &Money::from_minor(700, PLN));
        assert_eq!(basket.store_count(), 1);

        Ok(())
    }

    #[test]
    fn missing_product_is_unavailable() -> TestResult {
        let request = request(&[("milk", 1), ("caviar", 1)], Preference::unrestricted(3))?;
        let offers = offers(&[("milk", "s1", 350)]);

        let outcome = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none())?;

        assert_eq!(
            outcome.infeasibility(),
            Some(&Infeasibility::Unavailable {
                products: vec![ProductId::from("caviar")]
            })
        );

        Ok(())
    }

    #[test]
    fn no_offers_at_all_is_unavailable() -> TestResult {
        let request = request(&[("milk", 1), ("bread", 1)], Preference::unrestricted(3))?;

        let outcome = compute_basket(
            &request,
            OffersByProduct::default(),
            &PriceOrderSolver,
            &Interrupt::none(),
        )?;

        assert_eq!(
            outcome.infeasibility(),
            Some(&Infeasibility::Unavailable {
                products: vec![ProductId::from("milk"), ProductId::from("bread")]
            })
        );

        Ok(())
    }

    #[test]
    fn ignores_offers_for_unrequested_products() -> TestResult {
        let request = request(&[("milk", 1)], Preference::unrestricted(1))?;
        let offers = offers(&[("milk", "s1", 350), ("bread", "s2", 1)]);

        let outcome = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none())?;
        let basket = outcome.basket().ok_or("expected a basket")?;

        assert_eq!(basket.len(), 1);
        assert_eq!(basket.total(), &Money::from_minor(350, PLN));

        Ok(())
    }

    #[test]
    fn allow_list_excludes_other_stores() -> TestResult {
        let request = request(
            &[("milk", 1), ("bread", 1)],
            Preference::with_stores(["s2"], 5),
        )?;
        let offers = offers(&[
            ("milk", "s1", 100),
            ("milk", "s2", 300),
            ("bread", "s1", 100),
            ("bread", "s2", 300),
        ]);

        let outcome = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none())?;
        let basket = outcome.basket().ok_or("expected a basket")?;

        let stores: Vec<&StoreId> = basket
            .store_groups()
            .iter()
            .map(StoreGroup::store)
            .collect();

        assert_eq!(stores, vec![&StoreId::from("s2")]);
        assert_eq!(basket.total(), &Money::from_minor(600, PLN));

        Ok(())
    }

    #[test]
    fn product_outside_allow_list_is_reported() -> TestResult {
        let request = request(
            &[("milk", 1), ("bread", 1)],
            Preference::with_stores(["s1"], 1),
        )?;
        let offers = offers(&[("milk", "s1", 100), ("bread", "s2", 100)]);

        let outcome = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none())?;

        assert_eq!(
            outcome.infeasibility(),
            Some(&Infeasibility::NotInPreferredStores {
                products: vec![ProductId::from("bread")]
            })
        );

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_a_pricing_error() -> TestResult {
        let request = request(&[("milk", 1), ("bread", 1)], Preference::unrestricted(2))?;

        let mut offers = offers(&[("milk", "s1", 100)]);
        offers.insert(
            ProductId::from("bread"),
            vec![RawOffer::new("s2", "s2", Money::from_minor(100, EUR))],
        );

        let result = compute_basket(&request, offers, &PriceOrderSolver, &Interrupt::none());

        assert!(matches!(
            result,
            Err(BasketError::Pricing(PricingError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[test]
    fn interrupted_search_is_an_error() -> TestResult {
        let request = request(&[("milk", 1)], Preference::unrestricted(1))?;
        let offers = offers(&[("milk", "s1", 100)]);
        let interrupt = Interrupt::none().with_deadline(Instant::now());

        let result = compute_basket(&request, offers, &PriceOrderSolver, &interrupt);

        assert_eq!(
            result,
            Err(BasketError::Solver(SolverError::DeadlineExceeded))
        );

        Ok(())
    }

    #[test]
    fn minimum_cost_solver_can_be_selected() -> TestResult {
        let request = request(&[("a", 1), ("b", 1), ("c", 1)], Preference::unrestricted(2))?;
        let entries = [
            ("a", "s1", 100),
            ("b", "s2", 100),
            ("c", "s3", 100),
            ("a", "s3", 200),
            ("c", "s1", 10_000),
        ];

        let first = compute_basket(
            &request,
            offers(&entries),
            &PriceOrderSolver,
            &Interrupt::none(),
        )?;
        let minimum = compute_basket(
            &request,
            offers(&entries),
            &MinimumCostSolver,
            &Interrupt::none(),
        )?;

        assert_eq!(
            first.basket().map(|b| b.total().to_minor_units()),
            Some(10_200)
        );
        assert_eq!(
            minimum.basket().map(|b| b.total().to_minor_units()),
            Some(400)
        );

        Ok(())
    }
}
