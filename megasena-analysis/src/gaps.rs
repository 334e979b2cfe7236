use serde::Serialize;

use megasena_db::models::{Draw, POOL_SIZE};

/// Inter-occurrence statistics of one number, in draw-index units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapStat {
    pub average_gap: f64,
    pub current_gap: u32,
    pub max_gap: u32,
    pub min_gap: u32,
    pub is_overdue: bool,
}

impl GapStat {
    /// `current_gap / average_gap`, or 0 when the average is 0.
    pub fn overdue_ratio(&self) -> f64 {
        if self.average_gap > 0.0 {
            self.current_gap as f64 / self.average_gap
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapTable {
    pub total_draws: u32,
    stats: Vec<GapStat>,
}

impl GapTable {
    /// Wraps precomputed stats for numbers 1..=stats.len().
    pub fn from_stats(total_draws: u32, stats: Vec<GapStat>) -> Self {
        Self { total_draws, stats }
    }

    pub fn get(&self, number: u8) -> Option<&GapStat> {
        if number == 0 {
            return None;
        }
        self.stats.get((number - 1) as usize)
    }

    /// `(number, stat)` in ascending numeric order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &GapStat)> + '_ {
        self.stats.iter().enumerate().map(|(i, s)| ((i + 1) as u8, s))
    }

    pub fn overdue_count(&self) -> usize {
        self.stats.iter().filter(|s| s.is_overdue).count()
    }
}

/// Gap statistics for every number in 1..=60.
///
/// With `chronological` the valid draws are first sorted by date (stable, so
/// same-day draws keep their input order); otherwise the input order is taken
/// as the timeline.
pub fn gap_stats(draws: &[Draw], chronological: bool) -> GapTable {
    let mut timeline: Vec<&Draw> = draws.iter().filter(|d| d.is_valid()).collect();
    if chronological {
        timeline.sort_by_key(|d| d.draw_date);
    }

    let size = POOL_SIZE as usize;
    let mut gaps: Vec<Vec<u32>> = vec![Vec::new(); size];
    let mut last_seen: Vec<Option<u32>> = vec![None; size];

    for (index, draw) in timeline.iter().enumerate() {
        let index = index as u32;
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            if let Some(prev) = last_seen[idx] {
                gaps[idx].push(index - prev);
            }
            last_seen[idx] = Some(index);
        }
    }

    let total = timeline.len() as u32;
    let stats = gaps
        .iter()
        .zip(&last_seen)
        .map(|(gap_list, last)| {
            let average_gap = if gap_list.is_empty() {
                total as f64
            } else {
                gap_list.iter().sum::<u32>() as f64 / gap_list.len() as f64
            };
            let current_gap = match last {
                Some(last) => total - 1 - last,
                None => total,
            };
            GapStat {
                average_gap,
                current_gap,
                max_gap: gap_list.iter().copied().max().unwrap_or(total),
                min_gap: gap_list.iter().copied().min().unwrap_or(0),
                is_overdue: current_gap as f64 > average_gap,
            }
        })
        .collect();

    GapTable { total_draws: total, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::draw;

    #[test]
    fn test_number_seen_first_and_last() {
        let draws = vec![
            draw(1, "2024-01-01", [7, 1, 2, 3, 4, 5]),
            draw(2, "2024-01-04", [8, 1, 2, 3, 4, 5]),
            draw(3, "2024-01-07", [7, 10, 11, 12, 13, 14]),
        ];
        let table = gap_stats(&draws, true);
        let seven = table.get(7).unwrap();
        assert_eq!(seven.average_gap, 2.0);
        assert_eq!(seven.current_gap, 0);
        assert_eq!(seven.max_gap, 2);
        assert_eq!(seven.min_gap, 2);
        assert!(!seven.is_overdue);
    }

    #[test]
    fn test_absent_number() {
        let draws = vec![
            draw(1, "2024-01-01", [1, 2, 3, 4, 5, 6]),
            draw(2, "2024-01-04", [1, 2, 3, 4, 5, 7]),
        ];
        let table = gap_stats(&draws, true);
        let absent = table.get(60).unwrap();
        assert_eq!(absent.average_gap, 2.0);
        assert_eq!(absent.current_gap, 2);
        assert_eq!(absent.max_gap, 2);
        assert_eq!(absent.min_gap, 0);
        assert!(!absent.is_overdue);
    }

    #[test]
    fn test_single_occurrence_uses_total() {
        let draws = vec![
            draw(1, "2024-01-01", [6, 1, 2, 3, 4, 5]),
            draw(2, "2024-01-04", [7, 1, 2, 3, 4, 5]),
            draw(3, "2024-01-07", [8, 1, 2, 3, 4, 5]),
        ];
        let table = gap_stats(&draws, true);
        let six = table.get(6).unwrap();
        assert_eq!(six.average_gap, 3.0);
        assert_eq!(six.current_gap, 2);
        assert!(!six.is_overdue);

        let one = table.get(1).unwrap();
        assert_eq!(one.average_gap, 1.0);
        assert_eq!(one.current_gap, 0);
    }

    #[test]
    fn test_overdue_is_strict() {
        // 9 appears at 0 and 2 (average 2), then is absent for indices 3 and 4.
        let draws = vec![
            draw(1, "2024-01-01", [9, 1, 2, 3, 4, 5]),
            draw(2, "2024-01-02", [10, 1, 2, 3, 4, 5]),
            draw(3, "2024-01-03", [9, 11, 2, 3, 4, 5]),
            draw(4, "2024-01-04", [10, 1, 2, 3, 4, 5]),
            draw(5, "2024-01-05", [10, 1, 2, 3, 4, 5]),
        ];
        let table = gap_stats(&draws, true);
        let nine = table.get(9).unwrap();
        assert_eq!(nine.average_gap, 2.0);
        assert_eq!(nine.current_gap, 2);
        assert!(!nine.is_overdue);

        let more = gap_stats(&[draws.clone(), vec![draw(6, "2024-01-06", [10, 1, 2, 3, 4, 5])]].concat(), true);
        let nine = more.get(9).unwrap();
        assert_eq!(nine.current_gap, 3);
        assert!(nine.is_overdue);
        assert!((nine.overdue_ratio() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_sorts_by_date_when_chronological() {
        let draws = vec![
            draw(3, "2024-01-07", [7, 10, 11, 12, 13, 14]),
            draw(1, "2024-01-01", [7, 1, 2, 3, 4, 5]),
            draw(2, "2024-01-04", [8, 1, 2, 3, 4, 5]),
        ];
        let sorted = gap_stats(&draws, true);
        assert_eq!(sorted.get(7).unwrap().current_gap, 0);

        // Taken as given: 7 at indices 0 and 1, then absent once.
        let as_given = gap_stats(&draws, false);
        let seven = as_given.get(7).unwrap();
        assert_eq!(seven.average_gap, 1.0);
        assert_eq!(seven.current_gap, 1);
        assert!(!seven.is_overdue);
    }

    #[test]
    fn test_empty_history() {
        let table = gap_stats(&[], true);
        assert_eq!(table.total_draws, 0);
        assert_eq!(table.iter().count(), 60);
        for (_, stat) in table.iter() {
            assert_eq!(stat.average_gap, 0.0);
            assert_eq!(stat.current_gap, 0);
            assert!(!stat.is_overdue);
        }
        assert_eq!(table.overdue_count(), 0);
    }

    #[test]
    fn test_malformed_draws_ignored() {
        let draws = vec![
            draw(1, "2024-01-01", [7, 1, 2, 3, 4, 5]),
            draw(2, "2024-01-02", [7, 7, 2, 3, 4, 5]),
            draw(3, "2024-01-03", [7, 10, 11, 12, 13, 14]),
        ];
        let table = gap_stats(&draws, true);
        assert_eq!(table.total_draws, 2);
        assert_eq!(table.get(7).unwrap().average_gap, 1.0);
    }
}
