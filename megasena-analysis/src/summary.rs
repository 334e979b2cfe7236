use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use megasena_db::models::Draw;

use crate::distribution::{
    self, ConsecutiveDistribution, DecadeDistribution, EvenOdd, LowHigh, SUMMARY_SUM_BIN,
    SumDistribution,
};
use crate::frequency::{self, DEFAULT_HOT_COLD, FrequencyTable, HotCold, NumberFrequency};
use crate::gaps::{self, GapTable};

/// Draw number and date of one end of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrawMarker {
    pub draw_number: u32,
    pub draw_date: NaiveDate,
}

impl From<&Draw> for DrawMarker {
    fn from(draw: &Draw) -> Self {
        Self { draw_number: draw.draw_number, draw_date: draw.draw_date }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSummary {
    pub total_draws: usize,
    pub latest_draw: Option<DrawMarker>,
    pub first_draw: Option<DrawMarker>,
    pub frequency: FrequencyTable,
    pub hot_cold: HotCold,
    pub even_odd: BTreeMap<EvenOdd, u32>,
    pub low_high: BTreeMap<LowHigh, u32>,
    pub gaps: GapTable,
    pub consecutive: ConsecutiveDistribution,
    pub sums: SumDistribution,
    pub decades: DecadeDistribution,
}

/// Headline figures shown above the detailed tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub total_draws: usize,
    pub latest_draw: Option<DrawMarker>,
    pub first_draw: Option<DrawMarker>,
    /// Distinct numbers seen at least once, out of 60.
    pub numbers_drawn: usize,
    pub most_frequent: Option<NumberFrequency>,
    pub least_frequent: Option<NumberFrequency>,
    pub average_sum: f64,
    pub overdue_count: usize,
}

pub fn summarize(draws: &[Draw]) -> StatisticsSummary {
    let frequency = frequency::frequency(draws);
    let hot_cold = frequency::hot_cold(&frequency, DEFAULT_HOT_COLD);

    // Same-date ties: the latest is the first such draw in input order, the
    // first is the last one.
    let latest_draw = draws.iter().min_by_key(|d| Reverse(d.draw_date)).map(DrawMarker::from);
    let first_draw = draws.iter().max_by_key(|d| Reverse(d.draw_date)).map(DrawMarker::from);

    StatisticsSummary {
        total_draws: draws.len(),
        latest_draw,
        first_draw,
        hot_cold,
        frequency,
        even_odd: distribution::even_odd(draws),
        low_high: distribution::low_high(draws),
        gaps: gaps::gap_stats(draws, true),
        consecutive: distribution::consecutive(draws),
        sums: distribution::sum_distribution(draws, SUMMARY_SUM_BIN),
        decades: distribution::decades(draws),
    }
}

impl StatisticsSummary {
    pub fn cards(&self) -> SummaryCards {
        SummaryCards {
            total_draws: self.total_draws,
            latest_draw: self.latest_draw,
            first_draw: self.first_draw,
            numbers_drawn: self.frequency.iter().filter(|nf| nf.frequency > 0).count(),
            most_frequent: self.hot_cold.hot.first().copied(),
            least_frequent: self.hot_cold.cold.first().copied(),
            average_sum: self.sums.avg,
            overdue_count: self.gaps.overdue_count(),
        }
    }
}
