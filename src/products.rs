//! Products

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::ids::{BrandId, CategoryId, ProductId};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Brand identifier
    #[serde(rename = "id_brand")]
    pub id: BrandId,

    /// Brand name
    pub name: String,
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier
    #[serde(rename = "id_product")]
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product brand
    pub brand: Brand,

    /// Category the product is listed under
    #[serde(rename = "id_category")]
    pub category: CategoryId,

    /// Net weight in grams
    pub weight: Option<u32>,

    /// Volume in millilitres
    pub volume: Option<u32>,

    /// Catalog price description (e.g. "per kg")
    pub price_description: Option<String>,

    /// Whether the product may be bought in fractional amounts
    #[serde(default)]
    pub decimal_possibility: bool,
}
