use rand::Rng;
use tracing::{debug, warn};

use megasena_db::models::{PICK_COUNT, POOL_SIZE};

use super::{Combination, Metadata, Method};
use crate::distribution::{EvenOdd, LowHigh, even_count, low_count};

/// Candidates drawn before giving up on the constraints.
pub const MAX_ATTEMPTS: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct BalancedOptions {
    pub even_odd: EvenOdd,
    pub low_high: LowHigh,
    /// Inclusive.
    pub sum_range: (u32, u32),
    pub exclude: Vec<u8>,
    pub prefer: Vec<u8>,
}

impl Default for BalancedOptions {
    fn default() -> Self {
        Self {
            even_odd: EvenOdd { even: 3, odd: 3 },
            low_high: LowHigh { low: 3, high: 3 },
            sum_range: (150, 220),
            exclude: Vec::new(),
            prefer: Vec::new(),
        }
    }
}

impl BalancedOptions {
    /// Only the even and low counts are checked; odd and high follow from them.
    pub fn accepts(&self, numbers: &[u8]) -> bool {
        let sum: u32 = numbers.iter().map(|&n| u32::from(n)).sum();
        even_count(numbers) == self.even_odd.even
            && low_count(numbers) == self.low_high.low
            && (self.sum_range.0..=self.sum_range.1).contains(&sum)
    }

    /// Splits must each cover exactly six numbers and the sum range must not be inverted.
    fn obviously_infeasible(&self) -> bool {
        let split = |a: u8, b: u8| usize::from(a) + usize::from(b) != PICK_COUNT;
        split(self.even_odd.even, self.even_odd.odd)
            || split(self.low_high.low, self.low_high.high)
            || self.sum_range.0 > self.sum_range.1
    }

    fn pool(&self) -> Vec<u8> {
        (1..=POOL_SIZE).filter(|n| !self.exclude.contains(n)).collect()
    }
}

/// Rejection sampling against `options`, bounded by [`MAX_ATTEMPTS`].
///
/// Never fails: when no candidate passes, an unconstrained combination tagged
/// [`Method::RandomFallback`] is returned. If exclusions leave fewer than six
/// numbers, the fallback draws from the whole 1..=60 range.
pub fn balanced<R: Rng + ?Sized>(options: &BalancedOptions, rng: &mut R) -> Combination {
    let pool = options.pool();
    let feasible = pool.len() >= PICK_COUNT && !options.obviously_infeasible();

    if feasible {
        for attempt in 1..=MAX_ATTEMPTS {
            let numbers = random_combination(&pool, &options.prefer, rng);
            if options.accepts(&numbers) {
                debug!(attempt, "balanced combination accepted");
                let sum = numbers.iter().map(|&n| u32::from(n)).sum();
                return Combination::new(
                    numbers.to_vec(),
                    Method::Balanced,
                    Metadata::Constraints {
                        even_odd: options.even_odd,
                        low_high: options.low_high,
                        sum,
                    },
                );
            }
        }
    }

    warn!(
        even_odd = %options.even_odd,
        low_high = %options.low_high,
        sum_min = options.sum_range.0,
        sum_max = options.sum_range.1,
        "constraints not met, returning random combination"
    );
    let pool = if pool.len() >= PICK_COUNT {
        pool
    } else {
        (1..=POOL_SIZE).collect()
    };
    let numbers = random_combination(&pool, &options.prefer, rng);
    Combination::new(numbers.to_vec(), Method::RandomFallback, Metadata::None)
}

/// Preferred numbers present in `pool` first (in the given order), then a
/// uniform fill without replacement. `pool` must hold at least six numbers.
fn random_combination<R: Rng + ?Sized>(pool: &[u8], prefer: &[u8], rng: &mut R) -> [u8; PICK_COUNT] {
    let mut available = pool.to_vec();
    let mut picked = Vec::with_capacity(PICK_COUNT);

    for &n in prefer {
        if picked.len() == PICK_COUNT {
            break;
        }
        if let Some(pos) = available.iter().position(|&a| a == n) {
            picked.push(available.remove(pos));
        }
    }

    while picked.len() < PICK_COUNT {
        let idx = rng.random_range(0..available.len());
        picked.push(available.remove(idx));
    }

    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&picked);
    numbers
}
