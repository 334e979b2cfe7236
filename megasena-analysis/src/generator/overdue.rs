use rand::Rng;
use tracing::debug;

use megasena_db::models::POOL_SIZE;

use super::{Combination, Metadata, Method, OverdueDetail};
use crate::gaps::GapTable;

/// Picks the `count` most overdue numbers, ranked by `current_gap / average_gap`.
///
/// Missing slots are filled with random numbers not yet chosen (ratio 0).
/// `count` is capped at 60.
pub fn overdue<R: Rng + ?Sized>(gaps: &GapTable, count: usize, rng: &mut R) -> Combination {
    let count = count.min(POOL_SIZE as usize);

    let mut selected: Vec<OverdueDetail> = gaps
        .iter()
        .filter(|(_, stat)| stat.is_overdue)
        .map(|(number, stat)| OverdueDetail {
            number,
            overdue_ratio: stat.overdue_ratio(),
        })
        .collect();
    selected.sort_by(|a, b| {
        b.overdue_ratio
            .partial_cmp(&a.overdue_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    selected.truncate(count);

    let overdue_found = selected.len();
    while selected.len() < count {
        let number = rng.random_range(1..=POOL_SIZE);
        if !selected.iter().any(|d| d.number == number) {
            selected.push(OverdueDetail { number, overdue_ratio: 0.0 });
        }
    }
    debug!(overdue_found, padded = count - overdue_found, "overdue selection done");

    for detail in &mut selected {
        detail.overdue_ratio = (detail.overdue_ratio * 100.0).round() / 100.0;
    }
    let numbers = selected.iter().map(|d| d.number).collect();

    Combination::new(numbers, Method::Overdue, Metadata::Overdue(selected))
}
