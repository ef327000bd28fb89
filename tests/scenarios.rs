//! End to end basket scenarios.
//!
//! Each test builds the offers of a small market by hand and runs
//! `compute_basket` with both solvers.

use bestprice::{
    basket::{BasketOutcome, Infeasibility},
    ids::{ProductId, StoreId},
    offers::{OffersByProduct, RawOffer},
    optimizer::compute_basket,
    preferences::Preference,
    requests::{BasketRequest, RequestedItem},
    solvers::{Interrupt, MinimumCostSolver, PriceOrderSolver, Solver},
};
use rusty_money::{Money, iso::PLN};
use testresult::TestResult;

const SOLVERS: [&dyn Solver; 2] = [&PriceOrderSolver, &MinimumCostSolver];

fn offers(market: &[(&str, &str, i64)]) -> OffersByProduct<'static> {
    let mut offers = OffersByProduct::default();

    for &(product, store, minor) in market {
        offers
            .entry(ProductId::from(product))
            .or_insert_with(Vec::new)
            .push(RawOffer::new(
                store,
                format!("Store {store}"),
                Money::from_minor(minor, PLN),
            ));
    }

    offers
}

fn request(
    items: &[(&str, u32)],
    preference: Preference,
) -> Result<BasketRequest, Box<dyn std::error::Error>> {
    Ok(BasketRequest::new(
        items
            .iter()
            .map(|&(product, quantity)| RequestedItem::new(product, quantity)),
        preference,
    )?)
}

fn used_stores(outcome: &BasketOutcome<'_>) -> Vec<String> {
    outcome
        .basket()
        .map(|basket| {
            basket
                .store_groups()
                .iter()
                .map(|group| group.store().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn single_offer_is_multiplied_by_quantity() -> TestResult {
    let request = request(&[("milk", 2)], Preference::unrestricted(1))?;

    for solver in SOLVERS {
        let outcome = compute_basket(
            &request,
            offers(&[("milk", "s1", 350)]),
            solver,
            &Interrupt::none(),
        )?;

        let basket = outcome.basket().ok_or("expected a basket")?;
        let group = basket.store_groups().first().ok_or("expected one store")?;

        assert_eq!(basket.store_count(), 1);
        assert_eq!(group.store(), &StoreId::from("s1"));
        assert_eq!(basket.total(), &Money::from_minor(700, PLN));
    }

    Ok(())
}

#[test]
fn disjoint_stores_do_not_fit_one_store() -> TestResult {
    let request = request(&[("milk", 1), ("bread", 1)], Preference::unrestricted(1))?;

    for solver in SOLVERS {
        let outcome = compute_basket(
            &request,
            offers(&[("milk", "s1", 350), ("bread", "s2", 420)]),
            solver,
            &Interrupt::none(),
        )?;

        assert_eq!(
            outcome.infeasibility(),
            Some(&Infeasibility::StoreLimit { max_stores: 1 })
        );
    }

    Ok(())
}

#[test]
fn common_store_wins_when_only_one_store_is_allowed() -> TestResult {
    let request = request(&[("milk", 1), ("bread", 1)], Preference::unrestricted(1))?;
    let market = [
        ("milk", "cheap-milk", 250),
        ("bread", "cheap-bread", 300),
        ("milk", "common", 400),
        ("bread", "common", 450),
    ];

    for solver in SOLVERS {
        let outcome = compute_basket(&request, offers(&market), solver, &Interrupt::none())?;
        let basket = outcome.basket().ok_or("expected a basket")?;

        assert_eq!(used_stores(&outcome), vec!["common"]);
        assert_eq!(basket.total(), &Money::from_minor(850, PLN));
    }

    Ok(())
}

#[test]
fn cheaper_stores_are_used_when_the_bound_allows() -> TestResult {
    let request = request(&[("milk", 1), ("bread", 1)], Preference::unrestricted(2))?;
    let market = [
        ("milk", "cheap-milk", 250),
        ("bread", "cheap-bread", 300),
        ("milk", "common", 400),
        ("bread", "common", 450),
    ];

    for solver in SOLVERS {
        let outcome = compute_basket(&request, offers(&market), solver, &Interrupt::none())?;
        let basket = outcome.basket().ok_or("expected a basket")?;

        assert_eq!(used_stores(&outcome), vec!["cheap-bread", "cheap-milk"]);
        assert_eq!(basket.total(), &Money::from_minor(550, PLN));
    }

    Ok(())
}

#[test]
fn allow_list_missing_a_product_is_infeasible() -> TestResult {
    let request = request(
        &[("milk", 1), ("bread", 1)],
        Preference::with_stores(["s1"], 2),
    )?;

    for solver in SOLVERS {
        let outcome = compute_basket(
            &request,
            offers(&[("milk", "s1", 350), ("bread", "s2", 420)]),
            solver,
            &Interrupt::none(),
        )?;

        assert_eq!(
            outcome.infeasibility(),
            Some(&Infeasibility::NotInPreferredStores {
                products: vec![ProductId::from("bread")]
            })
        );
    }

    Ok(())
}

#[test]
fn product_carried_nowhere_is_named_in_the_reason() -> TestResult {
    let request = request(&[("milk", 1), ("caviar", 1)], Preference::unrestricted(3))?;

    for solver in SOLVERS {
        let outcome = compute_basket(
            &request,
            offers(&[("milk", "s1", 350)]),
            solver,
            &Interrupt::none(),
        )?;

        let infeasibility = outcome.infeasibility().ok_or("expected no basket")?;

        assert!(
            infeasibility.reason().contains("caviar"),
            "reason should name the product: {infeasibility}"
        );
        assert!(
            !infeasibility.reason().contains("milk"),
            "reason should not name available products: {infeasibility}"
        );
    }

    Ok(())
}

#[test]
fn store_bound_is_clamped_to_the_allow_list() -> TestResult {
    let items = [("milk", 1), ("bread", 1), ("eggs", 1), ("tea", 1)];
    let market = [
        ("milk", "s1", 100),
        ("bread", "s2", 100),
        ("eggs", "s3", 100),
        ("tea", "s3", 100),
        ("tea", "s4", 10),
    ];

    for solver in SOLVERS {
        let clamped = compute_basket(
            &request(&items, Preference::with_stores(["s1", "s2", "s3"], 10))?,
            offers(&market),
            solver,
            &Interrupt::none(),
        )?;
        let exact = compute_basket(
            &request(&items, Preference::with_stores(["s1", "s2", "s3"], 3))?,
            offers(&market),
            solver,
            &Interrupt::none(),
        )?;

        assert_eq!(clamped, exact);
        assert_eq!(used_stores(&clamped), vec!["s1", "s2", "s3"]);
    }

    Ok(())
}

#[test]
fn invalid_requests_are_rejected_before_searching() {
    assert!(
        request(&[], Preference::unrestricted(1)).is_err(),
        "empty list"
    );
    assert!(
        request(&[("milk", 0)], Preference::unrestricted(1)).is_err(),
        "zero quantity"
    );
    assert!(
        request(&[("milk", 1), ("milk", 2)], Preference::unrestricted(1)).is_err(),
        "duplicate product"
    );
    assert!(
        request(&[("milk", 1)], Preference::unrestricted(0)).is_err(),
        "zero stores"
    );
}

#[test]
fn cancelled_search_is_an_error() -> TestResult {
    use std::sync::{Arc, atomic::AtomicBool};

    let request = request(&[("milk", 1)], Preference::unrestricted(1))?;
    let interrupt = Interrupt::none().with_cancel_flag(Arc::new(AtomicBool::new(true)));

    for solver in SOLVERS {
        let result = compute_basket(&request, offers(&[("milk", "s1", 350)]), solver, &interrupt);

        assert!(result.is_err(), "{} ignored the cancel flag", solver.name());
    }

    Ok(())
}
