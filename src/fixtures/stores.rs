//! Chainstore and Store Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::catalog::GeoPoint;

/// Wrapper for chainstores in YAML
#[derive(Debug, Deserialize)]
pub struct ChainstoresFixture {
    /// Map of chainstore id -> chainstore fixture
    pub chainstores: FxHashMap<String, ChainstoreFixture>,
}

/// Chainstore Fixture
#[derive(Debug, Deserialize)]
pub struct ChainstoreFixture {
    /// Chain name
    pub name: String,
}

/// Wrapper for stores in YAML
#[derive(Debug, Deserialize)]
pub struct StoresFixture {
    /// Map of store id -> store fixture
    pub stores: FxHashMap<String, StoreFixture>,
}

/// Store Fixture
#[derive(Debug, Deserialize)]
pub struct StoreFixture {
    /// Chainstore id
    pub chainstore: String,

    /// Store name within the chain
    #[serde(default)]
    pub name: Option<String>,

    /// City
    #[serde(default)]
    pub city: Option<String>,

    /// Street and number
    #[serde(default)]
    pub street: Option<String>,

    /// District
    #[serde(default)]
    pub district: Option<String>,

    /// Region
    #[serde(default)]
    pub region: Option<String>,

    /// Location
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
}
