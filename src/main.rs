//! Command line interface for the basket optimizer

use anyhow::Result;
use bestprice::observability::init_subscriber;

use crate::cli::Cli;

mod cli;

fn main() -> Result<()> {
    let cli = Cli::load();

    init_subscriber(&cli.settings.logging)?;

    cli.run()
}
