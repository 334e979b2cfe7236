use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use megasena_db::models::{Draw, LOW_MAX, PICK_COUNT};

/// Bin width of the sum histogram in the summary.
pub const SUMMARY_SUM_BIN: u32 = 30;
/// Bin width of the detailed sum histogram.
pub const HISTOGRAM_SUM_BIN: u32 = 15;

pub const DECADE_LABELS: [&str; 6] = ["01-10", "11-20", "21-30", "31-40", "41-50", "51-60"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EvenOdd {
    pub even: u8,
    pub odd: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LowHigh {
    pub low: u8,
    pub high: u8,
}

impl EvenOdd {
    pub fn of(numbers: &[u8]) -> Self {
        let even = even_count(numbers);
        Self { even, odd: numbers.len() as u8 - even }
    }
}

impl LowHigh {
    pub fn of(numbers: &[u8]) -> Self {
        let low = low_count(numbers);
        Self { low, high: numbers.len() as u8 - low }
    }
}

impl fmt::Display for EvenOdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}E/{}O", self.even, self.odd)
    }
}

impl fmt::Display for LowHigh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}L/{}H", self.low, self.high)
    }
}

// Keys are rendered as their labels so the histograms serialize as JSON objects.
impl Serialize for EvenOdd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for LowHigh {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeDistribution {
    #[serde(serialize_with = "decade_counts")]
    pub counts: [u32; 6],
    pub total: u32,
}

fn decade_counts<S: Serializer>(counts: &[u32; 6], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(DECADE_LABELS.iter().zip(counts))
}

impl DecadeDistribution {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        DECADE_LABELS.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Draw counts indexed by number of consecutive pairs (0..=5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsecutiveDistribution {
    #[serde(serialize_with = "pair_counts")]
    pub counts: [u32; PICK_COUNT],
}

fn pair_counts<S: Serializer>(counts: &[u32; PICK_COUNT], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(counts.iter().enumerate().map(|(pairs, count)| (pairs.to_string(), count)))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumDistribution {
    pub min: u32,
    pub max: u32,
    pub avg: f64,
    pub sums: Vec<u32>,
    pub bin_size: u32,
    /// Keyed by bin start.
    pub distribution: BTreeMap<u32, u32>,
}

impl SumDistribution {
    pub fn from_sums(sums: Vec<u32>, bin_size: u32) -> Self {
        let bin_size = bin_size.max(1);
        let mut distribution = BTreeMap::new();
        for &sum in &sums {
            *distribution.entry(sum / bin_size * bin_size).or_insert(0) += 1;
        }

        let (min, max, avg) = if sums.is_empty() {
            (0, 0, 0.0)
        } else {
            let total: u64 = sums.iter().map(|&s| u64::from(s)).sum();
            (
                sums.iter().copied().min().unwrap_or(0),
                sums.iter().copied().max().unwrap_or(0),
                total as f64 / sums.len() as f64,
            )
        };

        Self { min, max, avg, sums, bin_size, distribution }
    }

    /// Same sums, bucketed with another width.
    pub fn rebin(&self, bin_size: u32) -> Self {
        Self::from_sums(self.sums.clone(), bin_size)
    }

    pub fn label(&self, bin_start: u32) -> String {
        let bin_end = bin_start.saturating_add(self.bin_size.saturating_sub(1));
        format!("{}-{}", bin_start, bin_end)
    }

    /// `(label, count)` in ascending bin order.
    pub fn bins(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.distribution.iter().map(|(&start, &count)| (self.label(start), count))
    }
}

struct LabeledBins<'a>(&'a SumDistribution);

impl Serialize for LabeledBins<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.bins())
    }
}

// The histogram is keyed by its "start-end" labels rather than bin starts.
impl Serialize for SumDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SumDistribution", 6)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("max", &self.max)?;
        state.serialize_field("avg", &self.avg)?;
        state.serialize_field("sums", &self.sums)?;
        state.serialize_field("bin_size", &self.bin_size)?;
        state.serialize_field("distribution", &LabeledBins(self))?;
        state.end()
    }
}

pub fn even_count(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| n % 2 == 0).count() as u8
}

pub fn low_count(numbers: &[u8]) -> u8 {
    numbers.iter().filter(|&&n| n <= LOW_MAX).count() as u8
}

pub fn consecutive_pairs(numbers: &[u8]) -> usize {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).filter(|w| w[1] - w[0] == 1).count()
}

fn valid(draws: &[Draw]) -> impl Iterator<Item = &Draw> {
    draws.iter().filter(|d| d.is_valid())
}

pub fn even_odd(draws: &[Draw]) -> BTreeMap<EvenOdd, u32> {
    let mut distribution = BTreeMap::new();
    for draw in valid(draws) {
        *distribution.entry(EvenOdd::of(&draw.numbers)).or_insert(0) += 1;
    }
    distribution
}

pub fn low_high(draws: &[Draw]) -> BTreeMap<LowHigh, u32> {
    let mut distribution = BTreeMap::new();
    for draw in valid(draws) {
        *distribution.entry(LowHigh::of(&draw.numbers)).or_insert(0) += 1;
    }
    distribution
}

pub fn decades(draws: &[Draw]) -> DecadeDistribution {
    let mut counts = [0u32; 6];
    let mut total = 0;
    for draw in valid(draws) {
        for &n in &draw.numbers {
            counts[((n - 1) / 10) as usize] += 1;
            total += 1;
        }
    }
    DecadeDistribution { counts, total }
}

pub fn consecutive(draws: &[Draw]) -> ConsecutiveDistribution {
    let mut counts = [0u32; PICK_COUNT];
    for draw in valid(draws) {
        counts[consecutive_pairs(&draw.numbers)] += 1;
    }
    ConsecutiveDistribution { counts }
}

pub fn sum_distribution(draws: &[Draw], bin_size: u32) -> SumDistribution {
    let sums = valid(draws).map(Draw::sum).collect();
    SumDistribution::from_sums(sums, bin_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draw;

    fn sample() -> Vec<Draw> {
        vec![
            draw(1, "2024-01-01", [1, 2, 3, 4, 5, 6]),
            draw(2, "2024-01-04", [2, 4, 6, 31, 33, 60]),
            draw(3, "2024-01-07", [10, 11, 20, 21, 40, 51]),
            draw(4, "2024-01-10", [7, 7, 8, 9, 10, 11]),
        ]
    }

    #[test]
    fn test_even_odd() {
        let dist = even_odd(&sample());
        assert_eq!(dist.get(&EvenOdd { even: 3, odd: 3 }), Some(&2));
        assert_eq!(dist.get(&EvenOdd { even: 4, odd: 2 }), Some(&1));
        assert_eq!(dist.values().sum::<u32>(), 3);
    }

    #[test]
    fn test_even_odd_labels() {
        assert_eq!(EvenOdd { even: 3, odd: 3 }.to_string(), "3E/3O");
        assert_eq!(LowHigh { low: 2, high: 4 }.to_string(), "2L/4H");
    }

    #[test]
    fn test_low_high() {
        let dist = low_high(&sample());
        assert_eq!(dist.get(&LowHigh { low: 6, high: 0 }), Some(&1));
        assert_eq!(dist.get(&LowHigh { low: 3, high: 3 }), Some(&1));
        assert_eq!(dist.get(&LowHigh { low: 4, high: 2 }), Some(&1));
    }

    #[test]
    fn test_low_boundary_is_thirty() {
        assert_eq!(low_count(&[30, 31]), 1);
    }

    #[test]
    fn test_decades_per_number() {
        let dist = decades(&sample());
        assert_eq!(dist.total, 18);
        assert_eq!(dist.counts, [10, 2, 1, 3, 0, 2]);
        assert_eq!(dist.iter().next(), Some(("01-10", 10)));
    }

    #[test]
    fn test_consecutive_pairs() {
        assert_eq!(consecutive_pairs(&[1, 2, 3, 4, 5, 6]), 5);
        assert_eq!(consecutive_pairs(&[60, 31, 2, 33, 4, 6]), 0);
        assert_eq!(consecutive_pairs(&[21, 10, 11, 20, 40, 51]), 2);

        let dist = consecutive(&sample());
        assert_eq!(dist.counts, [1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_sum_distribution() {
        let dist = sum_distribution(&sample(), 30);
        assert_eq!(dist.sums, vec![21, 136, 153]);
        assert_eq!(dist.min, 21);
        assert_eq!(dist.max, 153);
        assert!((dist.avg - 310.0 / 3.0).abs() < 1e-9);
        let bins: Vec<(String, u32)> = dist.bins().collect();
        assert_eq!(bins, vec![
            ("0-29".to_string(), 1),
            ("120-149".to_string(), 1),
            ("150-179".to_string(), 1),
        ]);
    }

    #[test]
    fn test_sum_rebin() {
        let dist = sum_distribution(&sample(), 30).rebin(15);
        assert_eq!(dist.bin_size, 15);
        let bins: Vec<(String, u32)> = dist.bins().collect();
        assert_eq!(bins[0], ("15-29".to_string(), 1));
        assert_eq!(bins[1], ("135-149".to_string(), 1));
    }

    #[test]
    fn test_sum_distribution_empty() {
        let dist = sum_distribution(&[], 30);
        assert_eq!(dist.min, 0);
        assert_eq!(dist.max, 0);
        assert_eq!(dist.avg, 0.0);
        assert!(dist.distribution.is_empty());
    }

    #[test]
    fn test_zero_bin_size_treated_as_one() {
        let dist = SumDistribution::from_sums(vec![21, 21, 22], 0);
        assert_eq!(dist.bin_size, 1);
        assert_eq!(dist.distribution.get(&21), Some(&2));
        assert_eq!(dist.label(21), "21-21");
    }

    #[test]
    fn test_histograms_serialize_with_labels() {
        let json = serde_json::to_value(even_odd(&sample())).unwrap();
        assert_eq!(json["3E/3O"], 2);
    }

    #[test]
    fn test_label_with_hand_built_zero_bin() {
        let dist = SumDistribution {
            min: 0,
            max: 0,
            avg: 0.0,
            sums: Vec::new(),
            bin_size: 0,
            distribution: BTreeMap::new(),
        };
        assert_eq!(dist.label(0), "0-0");
        assert_eq!(dist.label(u32::MAX), format!("{}-{}", u32::MAX, u32::MAX));

        let wide = SumDistribution { bin_size: 30, ..dist };
        assert_eq!(wide.label(u32::MAX - 5), format!("{}-{}", u32::MAX - 5, u32::MAX));
    }

    #[test]
    fn test_distributions_serialize_with_labels() {
        let draws = vec![draw(1, "2024-01-01", [10, 20, 30, 40, 50, 15])];

        let sums = serde_json::to_value(sum_distribution(&draws, 30)).unwrap();
        assert_eq!(sums["distribution"]["150-179"], 1);
        assert_eq!(sums["bin_size"], 30);
        assert_eq!(sums["sums"][0], 165);

        let by_decade = serde_json::to_value(decades(&draws)).unwrap();
        assert_eq!(by_decade["counts"]["01-10"], 1);
        assert_eq!(by_decade["counts"]["11-20"], 2);
        assert_eq!(by_decade["counts"]["51-60"], 0);
        assert_eq!(by_decade["total"], 6);

        let pairs = serde_json::to_value(consecutive(&draws)).unwrap();
        assert_eq!(pairs["counts"]["0"], 1);
        assert_eq!(pairs["counts"]["5"], 0);
    }
}
