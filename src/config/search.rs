//! Search Config

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::solvers::{Interrupt, MinimumCostSolver, PriceOrderSolver, Solver};

/// Basket search engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SolverKind {
    /// First feasible basket in price order.
    PriceOrder,

    /// Cheapest feasible basket, by branch and bound.
    Minimum,
}

impl SolverKind {
    /// The solver for this kind.
    pub fn solver(self) -> &'static dyn Solver {
        match self {
            SolverKind::PriceOrder => &PriceOrderSolver,
            SolverKind::Minimum => &MinimumCostSolver,
        }
    }
}

/// Basket search settings.
#[derive(Debug, Args)]
pub struct SearchConfig {
    /// Search engine (price-order, minimum)
    #[arg(
        long,
        env = "BESTPRICE_SOLVER",
        value_enum,
        default_value_t = SolverKind::PriceOrder,
        global = true
    )]
    pub solver: SolverKind,

    /// Abort a search running longer than this many milliseconds
    #[arg(long, env = "BESTPRICE_SEARCH_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,
}

impl SearchConfig {
    /// Configured search timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Interrupt for a search starting now.
    pub fn interrupt(&self) -> Interrupt {
        match self.timeout() {
            Some(timeout) => Interrupt::none().with_timeout(timeout),
            None => Interrupt::none(),
        }
    }
}
