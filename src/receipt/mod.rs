//! Receipt

use std::{fmt::Write, io};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::{Basket, BasketOutcome, StoreGroup, response::to_decimal},
    ids::ProductId,
    products::Product,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output could not be written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Printable summary of a basket outcome.
///
/// Products are named from the catalog when known, falling back to their id.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'r, 'a> {
    outcome: &'r BasketOutcome<'a>,
    products: &'r FxHashMap<ProductId, Product>,
    colored: bool,
}

impl<'r, 'a> Receipt<'r, 'a> {
    /// Create a receipt for `outcome`.
    pub fn new(
        outcome: &'r BasketOutcome<'a>,
        products: &'r FxHashMap<ProductId, Product>,
    ) -> Self {
        Self {
            outcome,
            products,
            colored: true,
        }
    }

    /// Render without ANSI colors.
    #[must_use]
    pub fn plain(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Writes the receipt to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        match self.outcome {
            BasketOutcome::Fulfilled(basket) => {
                self.write_table(&mut out, basket)?;
                self.write_summary(&mut out, basket)?;
            }
            BasketOutcome::Infeasible(infeasibility) => {
                writeln!(out, "\nNo basket: {}\n", infeasibility.reason())?;
            }
        }

        Ok(())
    }

    fn write_table(
        &self,
        out: &mut impl io::Write,
        basket: &Basket<'_>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();
        let mut group_boundary_rows: SmallVec<[usize; 8]> = SmallVec::new();

        builder.push_record(["Store", "Product", "Qty", "Unit Price", "Price"]);

        let mut row = 1;

        for group in basket.store_groups() {
            group_boundary_rows.push(row);
            row += self.append_group_rows(&mut builder, group);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();

        for &boundary in &group_boundary_rows {
            theme.insert_horizontal_line(boundary, separator);
        }

        table.with(theme);
        table.modify(Columns::new(2..5), Alignment::right());

        if self.colored {
            table.modify(Rows::first(), Color::BOLD);
        }

        let rendered = table.to_string();
        let rendered = if self.colored {
            dim_borders(&rendered)
        } else {
            rendered
        };

        writeln!(out, "\n{rendered}")?;

        Ok(())
    }

    /// Pushes one row per offer plus a store total row; returns the row count.
    fn append_group_rows(&self, builder: &mut Builder, group: &StoreGroup<'_>) -> usize {
        for (idx, offer) in group.offers().iter().enumerate() {
            let store = if idx == 0 { group.store_name() } else { "" };

            builder.push_record([
                store.to_string(),
                self.product_name(offer.product()),
                offer.quantity().to_string(),
                format_money(offer.unit_price()),
                format_money(offer.line_price()),
            ]);
        }

        builder.push_record([
            String::new(),
            format!("Total at {}", group.store_name()),
            String::new(),
            String::new(),
            format_money(group.total()),
        ]);

        group.offers().len() + 1
    }

    fn product_name(&self, product: &ProductId) -> String {
        self.products.get(product).map_or_else(
            || product.to_string(),
            |p| format!("{} ({})", p.name, p.brand.name),
        )
    }

    fn write_summary(
        &self,
        out: &mut impl io::Write,
        basket: &Basket<'_>,
    ) -> Result<(), ReceiptError> {
        let total = format_money(basket.total());
        let (bold, reset) = if self.colored {
            ("\x1b[1m", "\x1b[0m")
        } else {
            ("", "")
        };

        writeln!(out, " Stores: {}", basket.store_count())?;
        writeln!(out, " {bold}Total:{reset}  {bold}{total}{reset}")?;
        writeln!(out)?;

        Ok(())
    }
}

/// Formats an amount as `<decimal> <ISO code>`, e.g. `7.00 PLN`.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    format!("{} {}", to_decimal(money), money.currency().iso_alpha_code)
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in ANSI dark grey.
fn dim_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char != in_run {
            _ = out.write_str(if box_char { "\x1b[90m" } else { "\x1b[0m" });
            in_run = box_char;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}
