use anyhow::Result;
use bestprice::catalog::{ProductQuery, StoreFilter};
use clap::Args;

use super::{FixtureService, write_json};

#[derive(Debug, Args)]
pub(crate) struct StoresArgs {
    /// Only stores of this chainstore
    #[arg(long)]
    chainstore: Option<String>,

    /// Only stores in this district
    #[arg(long)]
    district: Option<String>,

    /// Only stores in this region
    #[arg(long)]
    region: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Words to search for; lists everything when omitted
    #[arg(default_value = "")]
    phrase: String,

    /// Only products in this category or its subcategories
    #[arg(long)]
    category: Option<String>,
}

pub(crate) fn stores(service: &FixtureService<'_>, args: &StoresArgs) -> Result<()> {
    let mut filter = StoreFilter::default();

    if let Some(chainstore) = &args.chainstore {
        filter = filter.chainstore(chainstore.as_str());
    }

    if let Some(district) = &args.district {
        filter = filter.district(district.as_str());
    }

    if let Some(region) = &args.region {
        filter = filter.region(region.as_str());
    }

    write_json(&service.stores(&filter)?)
}

pub(crate) fn products(service: &FixtureService<'_>, args: &ProductsArgs) -> Result<()> {
    let mut query = ProductQuery::phrase(args.phrase.as_str());

    if let Some(category) = &args.category {
        query = query.in_category(category.as_str());
    }

    write_json(&service.products(&query)?)
}
