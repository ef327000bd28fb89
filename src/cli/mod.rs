use std::io::{self, Write};

use anyhow::Result;
use bestprice::{
    catalog::InMemoryCatalog, config::Settings, fixtures::Fixture, service::PriceComparison,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

mod catalog;
mod shop;

#[derive(Debug, Parser)]
#[command(
    name = "bestprice",
    about = "Find the cheapest way to buy a shopping list",
    long_about = None
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the category tree
    Categories,

    /// List chainstores
    Chainstores,

    /// List stores
    Stores(catalog::StoresArgs),

    /// Search products
    Products(catalog::ProductsArgs),

    /// Compute the cheapest basket for a shopping list
    Shop(shop::ShopArgs),
}

impl Cli {
    /// Parse arguments after loading `.env`, if present.
    pub(crate) fn load() -> Self {
        _ = dotenvy::dotenv();

        Self::parse()
    }

    pub(crate) fn run(self) -> Result<()> {
        let fixture = self.settings.fixtures.load()?;

        match self.command {
            Commands::Categories => write_json(&service(&fixture).categories()?),
            Commands::Chainstores => write_json(&service(&fixture).chainstores()?),
            Commands::Stores(args) => catalog::stores(&service(&fixture), &args),
            Commands::Products(args) => catalog::products(&service(&fixture), &args),
            Commands::Shop(args) => shop::run(&fixture, &self.settings.search, &args),
        }
    }
}

type FixtureService<'f> = PriceComparison<&'f InMemoryCatalog, &'f InMemoryCatalog>;

fn service(fixture: &Fixture) -> FixtureService<'_> {
    PriceComparison::new(fixture.catalog(), fixture.catalog())
}

fn write_json(value: &impl Serialize) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;

    Ok(())
}
