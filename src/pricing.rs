//! Pricing
//!
//! Turns resolver offers into line prices. All arithmetic happens on integer
//! minor units so totals are exact and reproducible.

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    ids::{ProductId, StoreId},
    offers::{Offer, RawOffer},
    requests::RequestedItem,
};

/// Errors that can occur while pricing offers or summing totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The line price does not fit in the minor unit range.
    #[error("line price for product {product} at store {store} overflows")]
    Overflow {
        /// Product being priced
        product: ProductId,
        /// Store whose offer overflowed
        store: StoreId,
    },

    /// An offer is priced in a different currency than the basket.
    #[error("offer for product {product} at store {store} has currency {found}, expected {expected}")]
    CurrencyMismatch {
        /// Product being priced
        product: ProductId,
        /// Store whose offer has the wrong currency
        store: StoreId,
        /// Currency of the offer
        found: &'static str,
        /// Currency of the basket
        expected: &'static str,
    },

    /// No offers were provided, so currency could not be determined.
    #[error("no offers provided; cannot determine currency")]
    NoOffers,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Price every raw offer for a requested item.
///
/// Returns one [`Offer`] per raw offer, in the same order, with
/// `line_price = unit_price × quantity`.
///
/// # Errors
///
/// - [`PricingError::CurrencyMismatch`]: an offer is not priced in `currency`.
/// - [`PricingError::Overflow`]: the line price cannot be represented.
pub fn price_offers<'a>(
    item: &RequestedItem,
    raw_offers: impl IntoIterator<Item = RawOffer<'a>>,
    currency: &'a Currency,
) -> Result<Vec<Offer<'a>>, PricingError> {
    raw_offers
        .into_iter()
        .map(|raw| price_offer(item, raw, currency))
        .collect()
}

fn price_offer<'a>(
    item: &RequestedItem,
    raw: RawOffer<'a>,
    currency: &'a Currency,
) -> Result<Offer<'a>, PricingError> {
    let offer_currency = raw.unit_price.currency();

    if offer_currency != currency {
        return Err(PricingError::CurrencyMismatch {
            product: item.product.clone(),
            store: raw.store,
            found: offer_currency.iso_alpha_code,
            expected: currency.iso_alpha_code,
        });
    }

    let line_minor = raw
        .unit_price
        .to_minor_units()
        .checked_mul(i64::from(item.quantity))
        .ok_or_else(|| PricingError::Overflow {
            product: item.product.clone(),
            store: raw.store.clone(),
        })?;

    let line_price = Money::from_minor(line_minor, currency);

    Ok(Offer::new(item.product.clone(), raw, item.quantity, line_price))
}

/// Calculates the total line price of a list of offers
///
/// # Errors
///
/// - [`PricingError::NoOffers`]: No offers were provided, so currency could not be determined.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a, 'o>(
    offers: impl IntoIterator<Item = &'o Offer<'a>>,
) -> Result<Money<'a, Currency>, PricingError>
where
    'a: 'o,
{
    let mut offers = offers.into_iter();
    let first = offers.next().ok_or(PricingError::NoOffers)?;

    let total = offers.try_fold(*first.line_price(), |acc, offer| {
        acc.add(*offer.line_price())
    })?;

    Ok(total)
}
