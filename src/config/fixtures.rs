//! Fixture Config

use std::path::PathBuf;

use clap::Args;

use crate::fixtures::{Fixture, FixtureError};

/// Where catalog data is loaded from.
#[derive(Debug, Args)]
pub struct FixtureConfig {
    /// Directory holding the fixture sets
    #[arg(
        long,
        env = "BESTPRICE_FIXTURES_DIR",
        default_value = "./fixtures",
        global = true
    )]
    pub fixtures_dir: PathBuf,

    /// Name of the fixture set to load
    #[arg(
        long,
        env = "BESTPRICE_FIXTURE_SET",
        default_value = "warsaw",
        global = true
    )]
    pub fixture_set: String,
}

impl FixtureConfig {
    /// Load the configured fixture set.
    ///
    /// # Errors
    ///
    /// Returns an error if any fixture file cannot be read or is invalid.
    pub fn load(&self) -> Result<Fixture, FixtureError> {
        Fixture::from_set_in(self.fixtures_dir.clone(), &self.fixture_set)
    }
}
