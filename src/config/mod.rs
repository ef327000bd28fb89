//! Configuration
//!
//! Settings shared by every `bestprice` command, read from CLI arguments with
//! environment variable fallbacks.

use clap::Args;

pub mod fixtures;
pub mod logging;
pub mod search;

pub use fixtures::FixtureConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use search::{SearchConfig, SolverKind};

/// Settings common to every command
#[derive(Debug, Args)]
pub struct Settings {
    /// Fixture data settings.
    #[command(flatten)]
    pub fixtures: FixtureConfig,

    /// Basket search settings.
    #[command(flatten)]
    pub search: SearchConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
