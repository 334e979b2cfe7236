use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use megasena_db::models::{PICK_COUNT, POOL_SIZE};

use super::{Combination, Metadata, Method};
use crate::frequency::FrequencyTable;

/// Frequency-weighted sampling of up to `num_combinations` distinct combinations.
///
/// Stops after `num_simulations` attempts even if fewer were found. An empty
/// table falls back to uniform weights.
pub fn monte_carlo<R: Rng + ?Sized>(
    frequency: &FrequencyTable,
    num_simulations: usize,
    num_combinations: usize,
    rng: &mut R,
) -> Vec<Combination> {
    let weights = normalized_weights(frequency);
    let mut seen: HashSet<[u8; PICK_COUNT]> = HashSet::new();
    let mut combinations = Vec::with_capacity(num_combinations);

    let mut attempts = 0;
    while attempts < num_simulations && combinations.len() < num_combinations {
        attempts += 1;
        let mut numbers = weighted_selection(&weights, rng);
        numbers.sort_unstable();
        if seen.insert(numbers) {
            combinations.push(Combination::new(
                numbers.to_vec(),
                Method::MonteCarlo,
                Metadata::Confidence(confidence(&numbers, frequency)),
            ));
        }
    }

    debug!(attempts, found = combinations.len(), "monte carlo done");
    combinations
}

fn normalized_weights(frequency: &FrequencyTable) -> Vec<(u8, f64)> {
    let total = frequency.total();
    frequency
        .iter()
        .map(|nf| {
            let w = if total > 0 {
                nf.frequency as f64 / total as f64
            } else {
                1.0 / POOL_SIZE as f64
            };
            (nf.number, w)
        })
        .collect()
}

/// Six numbers without replacement by cumulative subtraction over the
/// remaining pool, in ascending numeric order.
fn weighted_selection<R: Rng + ?Sized>(weights: &[(u8, f64)], rng: &mut R) -> [u8; PICK_COUNT] {
    let mut available = weights.to_vec();
    let mut selected = [0u8; PICK_COUNT];

    for slot in selected.iter_mut() {
        let total: f64 = available.iter().map(|(_, w)| w).sum();
        let pick = if total > 0.0 {
            let mut remainder = rng.random::<f64>() * total;
            let mut pick = None;
            let mut last_positive = 0;
            for (i, &(_, w)) in available.iter().enumerate() {
                if w <= 0.0 {
                    continue;
                }
                last_positive = i;
                remainder -= w;
                if remainder <= 0.0 {
                    pick = Some(i);
                    break;
                }
            }
            // Rounding can leave a tiny positive remainder after the last weight.
            pick.unwrap_or(last_positive)
        } else {
            0
        };
        *slot = available.remove(pick).0;
    }

    selected
}

/// Mean of `count / (total / 60)` over the six numbers, as a capped percentage.
pub fn confidence(numbers: &[u8], frequency: &FrequencyTable) -> u8 {
    let total = frequency.total();
    if total == 0 || numbers.is_empty() {
        return 0;
    }
    let avg = total as f64 / POOL_SIZE as f64;
    let score: f64 = numbers.iter().map(|&n| frequency.get(n) as f64 / avg).sum();
    (score / numbers.len() as f64 * 100.0).round().min(100.0) as u8
}
