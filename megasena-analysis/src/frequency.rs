use serde::Serialize;

use megasena_db::models::{Draw, POOL_SIZE};

/// Hot/cold list length used by the summary.
pub const DEFAULT_HOT_COLD: usize = 10;

/// Occurrence count of every number in 1..=60. All 60 entries always exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    counts: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumberFrequency {
    pub number: u8,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotCold {
    pub hot: Vec<NumberFrequency>,
    pub cold: Vec<NumberFrequency>,
}

impl FrequencyTable {
    pub fn empty() -> Self {
        Self { counts: vec![0; POOL_SIZE as usize] }
    }

    /// Builds a table from explicit counts for numbers 1..=60, in order.
    /// Missing trailing entries are zero, extra entries are ignored.
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut table = Self::empty();
        for (slot, &c) in table.counts.iter_mut().zip(counts) {
            *slot = c;
        }
        table
    }

    /// Count for `number`; 0 outside 1..=60.
    pub fn get(&self, number: u8) -> u32 {
        if number == 0 {
            return 0;
        }
        self.counts.get((number - 1) as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(number, count)` in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = NumberFrequency> + '_ {
        self.counts.iter().enumerate().map(|(i, &frequency)| NumberFrequency {
            number: (i + 1) as u8,
            frequency,
        })
    }
}

pub fn frequency(draws: &[Draw]) -> FrequencyTable {
    let mut table = FrequencyTable::empty();
    for draw in draws.iter().filter(|d| d.is_valid()) {
        for &n in &draw.numbers {
            table.counts[(n - 1) as usize] += 1;
        }
    }
    table
}

/// Top-`k` and bottom-`k` numbers by count.
///
/// Both lists come from one stable descending sort, so equal counts keep
/// numeric order. `cold` is the tail of that ordering reversed, i.e. least
/// frequent first.
pub fn hot_cold(table: &FrequencyTable, k: usize) -> HotCold {
    let mut sorted: Vec<NumberFrequency> = table.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    let k = k.min(sorted.len());
    let hot = sorted[..k].to_vec();
    let cold = sorted[sorted.len() - k..].iter().rev().copied().collect();

    HotCold { hot, cold }
}
