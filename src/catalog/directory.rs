//! Chainstore and store directory

use serde::{Deserialize, Serialize};

use crate::ids::{ChainstoreId, StoreId};

/// A retail chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chainstore {
    /// Chainstore identifier
    #[serde(rename = "id_chain_store")]
    pub id: ChainstoreId,

    /// Chain name
    pub name: String,
}

/// A store's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,
}

/// A physical store belonging to a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Store identifier
    #[serde(rename = "id_store")]
    pub id: StoreId,

    /// Chain the store belongs to
    pub chainstore: Chainstore,

    /// Store name within the chain (e.g. "Mokotów")
    #[serde(rename = "store_name")]
    pub name: Option<String>,

    /// City
    pub city: Option<String>,

    /// Street and number
    #[serde(rename = "street_and_nr")]
    pub street: Option<String>,

    /// District
    pub district: Option<String>,

    /// Region
    pub region: Option<String>,

    /// Location
    pub coordinates: Option<GeoPoint>,
}

impl Store {
    /// "<chainstore name> <store name>", or the chainstore name alone.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("{} {name}", self.chainstore.name),
            _ => self.chainstore.name.clone(),
        }
    }
}

/// Narrows a store listing. Unset fields match every store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFilter {
    /// Only stores of this chain
    #[serde(default)]
    pub chainstore: Option<ChainstoreId>,

    /// Only stores in this district, compared case-insensitively
    #[serde(default)]
    pub district: Option<String>,

    /// Only stores in this region, compared case-insensitively
    #[serde(default)]
    pub region: Option<String>,
}

impl StoreFilter {
    /// Filter on a chain.
    #[must_use]
    pub fn chainstore(mut self, chainstore: impl Into<ChainstoreId>) -> Self {
        self.chainstore = Some(chainstore.into());
        self
    }

    /// Filter on a district.
    #[must_use]
    pub fn district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    /// Filter on a region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Whether `store` passes every set criterion.
    pub fn matches(&self, store: &Store) -> bool {
        let chainstore = self
            .chainstore
            .as_ref()
            .is_none_or(|chainstore| &store.chainstore.id == chainstore);

        chainstore
            && matches_text(self.district.as_deref(), store.district.as_deref())
            && matches_text(self.region.as_deref(), store.region.as_deref())
    }
}

fn matches_text(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted.map(str::trim), actual) {
        (None | Some(""), _) => true,
        (Some(wanted), Some(actual)) => actual.trim().to_lowercase() == wanted.to_lowercase(),
        (Some(_), None) => false,
    }
}
