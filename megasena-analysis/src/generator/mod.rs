pub mod balanced;
pub mod monte_carlo;
pub mod overdue;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use megasena_db::models::PICK_COUNT;

use crate::config::{GeneratorConfig, Strategy};
use crate::distribution::{EvenOdd, LowHigh, even_count, low_count};
use crate::frequency::FrequencyTable;
use crate::gaps::GapTable;
use crate::metrics;

pub use balanced::{BalancedOptions, MAX_ATTEMPTS, balanced};
pub use monte_carlo::monte_carlo;
pub use overdue::overdue;

/// Simulation budget of one Monte Carlo run from [`generate`].
pub const SIMULATIONS_PER_RUN: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    MonteCarlo,
    Balanced,
    /// Balanced constraints could not be met; numbers are unconstrained.
    RandomFallback,
    Overdue,
}

impl Method {
    pub fn label(&self) -> &'static str {
        match self {
            Method::MonteCarlo => "Monte Carlo",
            Method::Balanced => "Balanced Constraints",
            Method::RandomFallback => "Random (constraints too strict)",
            Method::Overdue => "Gap Analysis (Overdue)",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverdueDetail {
    pub number: u8,
    /// Rounded to 2 decimals; 0 for padding numbers.
    pub overdue_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metadata {
    Confidence(u8),
    Constraints {
        even_odd: EvenOdd,
        low_high: LowHigh,
        sum: u32,
    },
    Overdue(Vec<OverdueDetail>),
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    /// Sorted ascending, distinct.
    pub numbers: Vec<u8>,
    pub method: Method,
    pub metadata: Metadata,
}

impl Combination {
    pub fn new(mut numbers: Vec<u8>, method: Method, metadata: Metadata) -> Self {
        numbers.sort_unstable();
        Self { numbers, method, metadata }
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| u32::from(n)).sum()
    }

    pub fn even_count(&self) -> u8 {
        even_count(&self.numbers)
    }

    pub fn low_count(&self) -> u8 {
        low_count(&self.numbers)
    }

    /// Shannon entropy of the numbers, see [`metrics::entropy`].
    pub fn entropy(&self) -> f64 {
        metrics::entropy(&self.numbers)
    }

    pub fn variance(&self) -> f64 {
        metrics::variance(&self.numbers)
    }

    pub fn is_fallback(&self) -> bool {
        self.method == Method::RandomFallback
    }
}

/// Seeded generator when `seed` is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Runs the configured strategy `config.count` times.
///
/// Each Monte Carlo run asks for a single combination with a budget of
/// `config.simulations` attempts, so repeated runs may return the same numbers.
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    frequency: &FrequencyTable,
    gaps: &GapTable,
    rng: &mut R,
) -> Vec<Combination> {
    let options = config.balanced_options();
    let mut combinations = Vec::with_capacity(config.count);

    for _ in 0..config.count {
        let combination = match config.strategy {
            Strategy::MonteCarlo => monte_carlo(frequency, config.simulations, 1, rng).into_iter().next(),
            Strategy::Balanced => Some(balanced(&options, rng)),
            Strategy::Overdue => Some(overdue(gaps, PICK_COUNT, rng)),
        };
        combinations.extend(combination);
    }

    combinations
}
