use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use crate::import::ImportResult;
use megasena_analysis::distribution::HISTOGRAM_SUM_BIN;
use megasena_analysis::frequency::{FrequencyTable, NumberFrequency};
use megasena_analysis::gaps::GapStat;
use megasena_analysis::summary::DrawMarker;
use megasena_analysis::{Combination, Metadata, Method, StatisticsSummary};
use megasena_db::models::{Draw, POOL_SIZE};

const TOP_OVERDUE: usize = 10;
const GRID_COLUMNS: usize = 10;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Share of `total` as a percentage with one decimal, `0.0%` when total is 0.
fn percent(count: u32, total: u32) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("No draws to display.");
        return;
    }

    let mut table = new_table(vec!["Draw", "Date", "Numbers", "Sum"]);
    for draw in draws {
        table.add_row(vec![
            draw.draw_number.to_string(),
            draw.draw_date.format("%d/%m/%Y").to_string(),
            format_numbers(&draw.sorted_numbers()),
            draw.sum().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Rows read          : {}", result.rows);
    println!("  Valid draws        : {}", result.parsed);
    println!("  Inserted           : {}", result.inserted);
    println!("  Duplicates skipped : {}", result.skipped);
    if result.dropped > 0 {
        println!("  Invalid rows       : {}", result.dropped);
    }
}

pub fn display_summary(summary: &StatisticsSummary, window: u32) {
    let cards = summary.cards();
    println!("\nStatistics over the last {} draws\n", window);

    let marker = |m: Option<DrawMarker>| {
        m.map(|m| format!("{} (draw {})", m.draw_date.format("%d/%m/%Y"), m.draw_number))
            .unwrap_or_else(|| "-".to_string())
    };
    let mut table = new_table(vec!["Draws", "Latest draw", "First draw", "Numbers in pool"]);
    table.add_row(vec![
        cards.total_draws.to_string(),
        marker(cards.latest_draw),
        marker(cards.first_draw),
        format!("{} of {}", cards.numbers_drawn, POOL_SIZE),
    ]);
    println!("{table}");

    let describe = |nf: Option<NumberFrequency>| {
        nf.map(|f| format!("{:02} ({}x)", f.number, f.frequency))
            .unwrap_or_else(|| "-".to_string())
    };
    let mut table = new_table(vec!["Most frequent", "Least frequent", "Average sum", "Overdue"]);
    table.add_row(vec![
        describe(cards.most_frequent),
        describe(cards.least_frequent),
        format!("{:.1}", cards.average_sum),
        cards.overdue_count.to_string(),
    ]);
    println!("{table}");

    display_frequency_grid(&summary.frequency, summary.total_draws as u32);
    display_hot_cold(summary);
    display_patterns(summary);
    display_sum_histogram(summary);
    display_overdue(summary);
}

/// Shade of a count between the table's minimum and maximum.
fn intensity_color(frequency: u32, min: u32, max: u32) -> Color {
    let intensity = if max > min {
        f64::from(frequency - min) / f64::from(max - min)
    } else {
        0.0
    };
    match intensity {
        i if i > 0.8 => Color::Green,
        i if i > 0.6 => Color::DarkGreen,
        i if i > 0.4 => Color::Cyan,
        i if i > 0.2 => Color::DarkCyan,
        _ => Color::Grey,
    }
}

/// All 60 numbers, ten per row, with count and share of draws.
fn display_frequency_grid(frequency: &FrequencyTable, draws: u32) {
    let min = frequency.iter().map(|nf| nf.frequency).min().unwrap_or(0);
    let max = frequency.iter().map(|nf| nf.frequency).max().unwrap_or(0);
    let avg = f64::from(frequency.total()) / f64::from(POOL_SIZE);
    println!("\n-- Frequency (min {}x, average {:.1}x, max {}x) --", min, avg, max);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let cells: Vec<Cell> = frequency
        .iter()
        .map(|nf| {
            Cell::new(format!("{:02}\n{}x\n{}", nf.number, nf.frequency, percent(nf.frequency, draws)))
                .fg(intensity_color(nf.frequency, min, max))
        })
        .collect();
    for row in cells.chunks(GRID_COLUMNS) {
        table.add_row(row.to_vec());
    }
    println!("{table}");
}

fn display_hot_cold(summary: &StatisticsSummary) {
    println!("\n-- Hot and cold numbers --");
    let mut table = new_table(vec!["Rank", "Hot", "Freq", "Cold", "Freq"]);
    for (i, (hot, cold)) in summary.hot_cold.hot.iter().zip(&summary.hot_cold.cold).enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:02}", hot.number)).fg(Color::Red),
            Cell::new(hot.frequency),
            Cell::new(format!("{:02}", cold.number)).fg(Color::Blue),
            Cell::new(cold.frequency),
        ]);
    }
    println!("{table}");
}

fn display_patterns(summary: &StatisticsSummary) {
    let draws: u32 = summary.even_odd.values().sum();

    println!("\n-- Even / odd --");
    let mut table = new_table(vec!["Split", "Draws", "Share"]);
    for (split, &count) in &summary.even_odd {
        table.add_row(vec![split.to_string(), count.to_string(), percent(count, draws)]);
    }
    println!("{table}");

    println!("\n-- Low (1-30) / high (31-60) --");
    let mut table = new_table(vec!["Split", "Draws", "Share"]);
    for (split, &count) in &summary.low_high {
        table.add_row(vec![split.to_string(), count.to_string(), percent(count, draws)]);
    }
    println!("{table}");

    println!("\n-- Decades --");
    let mut table = new_table(vec!["Range", "Numbers drawn", "Share"]);
    for (label, count) in summary.decades.iter() {
        table.add_row(vec![label.to_string(), count.to_string(), percent(count, summary.decades.total)]);
    }
    println!("{table}");

    println!("\n-- Consecutive pairs --");
    let mut table = new_table(vec!["Pairs", "Draws", "Share"]);
    for (pairs, &count) in summary.consecutive.counts.iter().enumerate() {
        table.add_row(vec![pairs.to_string(), count.to_string(), percent(count, draws)]);
    }
    println!("{table}");
}

fn display_sum_histogram(summary: &StatisticsSummary) {
    let sums = summary.sums.rebin(HISTOGRAM_SUM_BIN);
    let total = sums.sums.len() as u32;
    println!(
        "\n-- Sums (min {}, max {}, average {:.1}) --",
        sums.min, sums.max, sums.avg
    );
    if total == 0 {
        return;
    }
    let mut table = new_table(vec!["Range", "Draws", "Share"]);
    for (label, count) in sums.bins() {
        table.add_row(vec![label, count.to_string(), percent(count, total)]);
    }
    println!("{table}");
}

/// Numbers sorted by overdue ratio, highest first.
fn ranked_overdue(summary: &StatisticsSummary) -> Vec<(u8, &GapStat)> {
    let mut ranked: Vec<(u8, &GapStat)> = summary.gaps.iter().filter(|(_, s)| s.is_overdue).collect();
    ranked.sort_by(|a, b| {
        b.1.overdue_ratio()
            .partial_cmp(&a.1.overdue_ratio())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(TOP_OVERDUE);
    ranked
}

fn display_overdue(summary: &StatisticsSummary) {
    let gaps = &summary.gaps;
    let overdue = gaps.overdue_count();
    let max_current = gaps.iter().map(|(_, s)| s.current_gap).max().unwrap_or(0);
    let mean_gap = gaps.iter().map(|(_, s)| s.average_gap).sum::<f64>() / f64::from(POOL_SIZE);

    println!(
        "\n-- Gaps: {} overdue, {} up to date, longest current gap {}, average gap {:.1} --",
        overdue,
        POOL_SIZE as usize - overdue,
        max_current,
        mean_gap
    );

    let ranked = ranked_overdue(summary);
    if ranked.is_empty() {
        return;
    }
    let mut table = new_table(vec!["Number", "Current", "Average", "Min", "Max", "Ratio"]);
    for (number, stat) in ranked {
        table.add_row(vec![
            Cell::new(format!("{:02}", number)).fg(Color::Yellow),
            Cell::new(stat.current_gap),
            Cell::new(format!("{:.1}", stat.average_gap)),
            Cell::new(stat.min_gap),
            Cell::new(stat.max_gap),
            Cell::new(format!("{:.2}", stat.overdue_ratio())),
        ]);
    }
    println!("{table}");
}

fn describe_metadata(metadata: &Metadata) -> String {
    match metadata {
        Metadata::Confidence(c) => format!("confidence {}%", c),
        Metadata::Constraints { even_odd, low_high, sum } => {
            format!("{} {} sum {}", even_odd, low_high, sum)
        }
        Metadata::Overdue(details) => details
            .iter()
            .map(|d| format!("{:02}:{:.2}", d.number, d.overdue_ratio))
            .collect::<Vec<_>>()
            .join(" "),
        Metadata::None => "-".to_string(),
    }
}

pub fn display_combinations(combinations: &[Combination]) {
    if combinations.is_empty() {
        println!("No combination generated.");
        return;
    }

    println!("\nSuggested combinations\n");
    let mut table = new_table(vec![
        "#", "Numbers", "Method", "Sum", "Even", "Low", "Entropy", "Variance", "Details",
    ]);
    for (i, combo) in combinations.iter().enumerate() {
        let method = Cell::new(combo.method.label());
        let method = if combo.method == Method::RandomFallback {
            method.fg(Color::Yellow)
        } else {
            method
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format_numbers(&combo.numbers)),
            method,
            Cell::new(combo.sum()),
            Cell::new(combo.even_count()),
            Cell::new(combo.low_count()),
            Cell::new(format!("{:.2}", combo.entropy())),
            Cell::new(format!("{:.1}", combo.variance())),
            Cell::new(describe_metadata(&combo.metadata)),
        ]);
    }
    println!("{table}");

    if combinations.iter().any(Combination::is_fallback) {
        println!("Some constraints could not be satisfied; those combinations are unconstrained.");
    }
    println!("Lottery draws are independent: no combination is more likely than another.");
}
