//! Shopping against the bundled `warsaw` fixture set.

use bestprice::{
    catalog::{Catalog, ProductQuery, StoreFilter},
    fixtures::Fixture,
    receipt::Receipt,
    service::PriceComparison,
    solvers::{Interrupt, MinimumCostSolver, PriceOrderSolver},
};
use rust_decimal::Decimal;
use testresult::TestResult;

#[test]
fn breakfast_list_fits_two_stores() -> TestResult {
    let fixture = Fixture::from_set("warsaw")?;
    let service = PriceComparison::new(fixture.catalog(), fixture.catalog());
    let request = fixture.load_list("breakfast")?;

    let first = service.shop(&request, &PriceOrderSolver, &Interrupt::none())?;
    let cheapest = service.shop(&request, &MinimumCostSolver, &Interrupt::none())?;

    assert!(first.is_fulfilled(), "price order found nothing: {first:?}");
    assert!(first.stores.len() <= 2, "too many stores: {first:?}");

    assert_eq!(cheapest.price_total, Some(Decimal::new(2_800, 2)));
    assert!(
        first.price_total >= cheapest.price_total,
        "minimum is not minimal"
    );

    let stores: Vec<&str> = cheapest
        .stores
        .iter()
        .map(|store| store.id.as_str())
        .collect();

    assert_eq!(stores, vec!["carrefour-arkadia", "lidl-wola"]);

    let milk = cheapest
        .stores
        .iter()
        .flat_map(|store| &store.products)
        .find(|product| product.id.as_str() == "mleko-laciate-2")
        .ok_or("milk missing from basket")?;

    assert_eq!(milk.quantity, 2);
    assert_eq!(milk.unit_price, Decimal::new(329, 2));
    assert_eq!(milk.price, Decimal::new(658, 2));
    assert_eq!(milk.brand, "Łaciate");

    Ok(())
}

#[test]
fn caviar_list_reports_the_unavailable_product() -> TestResult {
    let fixture = Fixture::from_set("warsaw")?;
    let service = PriceComparison::new(fixture.catalog(), fixture.catalog());
    let request = fixture.load_list("caviar")?;

    let response = service.shop(&request, &PriceOrderSolver, &Interrupt::none())?;

    assert!(
        response.stores.is_empty(),
        "infeasible answers carry no stores"
    );
    assert_eq!(
        response.error.as_deref(),
        Some("not available in any store: kawior")
    );

    Ok(())
}

#[test]
fn wola_list_only_uses_preferred_stores() -> TestResult {
    let fixture = Fixture::from_set("warsaw")?;
    let service = PriceComparison::new(fixture.catalog(), fixture.catalog());
    let request = fixture.load_list("wola")?;

    let response = service.shop(&request, &PriceOrderSolver, &Interrupt::none())?;
    let allowed = request.preference().allowed_stores();

    assert!(
        response.is_fulfilled(),
        "wola list should be fulfilled: {response:?}"
    );

    for store in &response.stores {
        assert!(allowed.contains(&store.id), "{} is not preferred", store.id);
    }

    Ok(())
}

#[test]
fn weekly_list_renders_a_receipt() -> TestResult {
    let fixture = Fixture::from_set("warsaw")?;
    let service = PriceComparison::new(fixture.catalog(), fixture.catalog());
    let request = fixture.load_list("weekly")?;

    let outcome = service.basket(&request, &MinimumCostSolver, &Interrupt::none())?;
    let products = service.product_details(&request)?;

    let mut out = Vec::new();
    Receipt::new(&outcome, &products)
        .plain()
        .write_to(&mut out)?;
    let text = String::from_utf8(out)?;

    assert!(
        outcome.is_fulfilled(),
        "weekly list should be fulfilled:\n{text}"
    );
    assert!(
        text.contains("Kawa mielona"),
        "product names are shown:\n{text}"
    );
    assert!(text.contains("Total:"), "basket total is shown:\n{text}");

    Ok(())
}

#[test]
fn catalog_browsing() -> TestResult {
    let fixture = Fixture::from_set("warsaw")?;
    let catalog = fixture.catalog();

    let roots: Vec<String> = catalog
        .categories()?
        .iter()
        .map(|category| category.id.to_string())
        .collect();

    assert_eq!(roots, vec!["food", "drinks", "household"]);

    let wola = catalog.stores(&StoreFilter::default().district("wola"))?;

    assert_eq!(wola.len(), 3);

    let lidl = catalog.stores(&StoreFilter::default().chainstore("lidl"))?;

    assert_eq!(lidl.len(), 2);

    let milk = catalog.products(&ProductQuery::phrase("mleko"))?;
    let ids: Vec<&str> = milk.iter().map(|product| product.id.as_str()).collect();

    assert_eq!(
        ids.len(),
        3,
        "two milks by name, one cheese by brand: {ids:?}"
    );
    assert_eq!(ids.last(), Some(&"ser-gouda"), "brand matches rank last");

    let dairy = catalog.products(&ProductQuery::default().in_category("dairy"))?;

    assert_eq!(dairy.len(), 4);

    Ok(())
}
