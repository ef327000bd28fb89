use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    time::Instant,
};

use anyhow::{Context, Result};
use bestprice::{
    basket::ShopResponse, config::SearchConfig, fixtures::Fixture, receipt::Receipt,
    requests::BasketRequest,
};
use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use super::{service, write_json};

#[derive(Debug, Args)]
pub(crate) struct ShopArgs {
    /// Shopping list name from the fixtures' `lists` directory
    #[arg(required_unless_present = "request")]
    list: Option<String>,

    /// Read the shop request from a JSON file instead
    #[arg(long, conflicts_with = "list")]
    request: Option<PathBuf>,

    /// Print a receipt table instead of JSON
    #[arg(long)]
    receipt: bool,
}

pub(crate) fn run(fixture: &Fixture, search: &SearchConfig, args: &ShopArgs) -> Result<()> {
    let request = load_request(fixture, args)?;
    let service = service(fixture);
    let solver = search.solver.solver();

    let start = Instant::now();
    let outcome = service.basket(&request, solver, &search.interrupt())?;
    let elapsed = start.elapsed();

    info!(
        solver = solver.name(),
        elapsed = %elapsed.human(Truncate::Nano),
        fulfilled = outcome.is_fulfilled(),
        "basket computed"
    );

    let products = service.product_details(&request)?;

    if !args.receipt {
        return write_json(&ShopResponse::from_outcome(&outcome, &products));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&outcome, &products).write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}

fn load_request(fixture: &Fixture, args: &ShopArgs) -> Result<BasketRequest> {
    if let Some(path) = &args.request {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        return Ok(serde_json::from_str(&json)?);
    }

    let name = args.list.as_deref().unwrap_or_default();

    Ok(fixture.load_list(name)?)
}
