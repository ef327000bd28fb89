//! Product search

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::{ids::CategoryId, products::Product};

/// Most products a single search returns.
pub const MAX_SEARCH_RESULTS: usize = 100;

const WORD_PREFIX_SCORE: u32 = 3;
const SUBSTRING_SCORE: u32 = 2;
const BRAND_SCORE: u32 = 1;

/// A product search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Only products in this category or below it
    #[serde(default)]
    pub category: Option<CategoryId>,

    /// Words to look for; empty lists every product in scope
    #[serde(default)]
    pub phrase: String,
}

impl ProductQuery {
    /// Search for `phrase` in every category.
    pub fn phrase(phrase: impl Into<String>) -> Self {
        ProductQuery {
            category: None,
            phrase: phrase.into(),
        }
    }

    /// Restrict the search to `category` and its descendants.
    #[must_use]
    pub fn in_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Rank `products` against `phrase`.
///
/// Every whitespace separated token must match the product name or brand name,
/// ignoring case. A token starting a word of the name scores highest, then a
/// token found anywhere in the name, then a token found in the brand. Results
/// are ordered by score, then name, then id, and capped at
/// [`MAX_SEARCH_RESULTS`]. Only products whose category passes `in_scope`
/// are considered.
pub fn search_products<'p>(
    products: impl IntoIterator<Item = &'p Product>,
    in_scope: impl Fn(&CategoryId) -> bool,
    phrase: &str,
) -> Vec<&'p Product> {
    let tokens: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();

    let mut ranked: Vec<(u32, &'p Product)> = products
        .into_iter()
        .filter(|product| in_scope(&product.category))
        .filter_map(|product| score(product, &tokens).map(|score| (score, product)))
        .collect();

    ranked.sort_by(|(a_score, a), (b_score, b)| {
        (Reverse(a_score), &a.name, &a.id).cmp(&(Reverse(b_score), &b.name, &b.id))
    });

    ranked
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, product)| product)
        .collect()
}

fn score(product: &Product, tokens: &[String]) -> Option<u32> {
    let name = product.name.to_lowercase();
    let brand = product.brand.name.to_lowercase();

    tokens.iter().try_fold(0, |total, token| {
        let token_score = if name.split_whitespace().any(|word| word.starts_with(token)) {
            WORD_PREFIX_SCORE
        } else if name.contains(token.as_str()) {
            SUBSTRING_SCORE
        } else if brand.contains(token.as_str()) {
            BRAND_SCORE
        } else {
            return None;
        };

        Some(total + token_score)
    })
}
