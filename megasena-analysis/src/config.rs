use serde::{Deserialize, Serialize};

use crate::distribution::{EvenOdd, LowHigh};
use crate::generator::{BalancedOptions, SIMULATIONS_PER_RUN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    #[default]
    Balanced,
    MonteCarlo,
    Overdue,
}

/// Everything the generator can be asked for. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub strategy: Strategy,
    pub count: usize,
    pub simulations: usize,
    pub even: u8,
    pub odd: u8,
    pub low: u8,
    pub high: u8,
    pub sum_min: u32,
    pub sum_max: u32,
    pub exclude: Vec<u8>,
    pub prefer: Vec<u8>,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Balanced,
            count: 5,
            simulations: SIMULATIONS_PER_RUN,
            even: 3,
            odd: 3,
            low: 3,
            high: 3,
            sum_min: 150,
            sum_max: 220,
            exclude: Vec::new(),
            prefer: Vec::new(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn balanced_options(&self) -> BalancedOptions {
        BalancedOptions {
            even_odd: EvenOdd { even: self.even, odd: self.odd },
            low_high: LowHigh { low: self.low, high: self.high },
            sum_range: (self.sum_min, self.sum_max),
            exclude: self.exclude.clone(),
            prefer: self.prefer.clone(),
        }
    }
}
