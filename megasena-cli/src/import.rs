use anyhow::{Context, Result};
use chrono::NaiveDate;
use megasena_db::rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

use megasena_db::db::bulk_create;
use megasena_db::models::{Draw, PICK_COUNT, is_in_pool, validate_numbers};

const SEPARATORS: [char; 3] = [',', ';', '\t'];
// Day-first before year-first: `%Y` also accepts a two-digit year.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

#[derive(Debug, Default)]
pub struct ParseResult {
    pub draws: Vec<Draw>,
    pub rows: u32,
    pub headers: u32,
    pub dropped: u32,
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub rows: u32,
    pub parsed: u32,
    pub dropped: u32,
    pub inserted: u32,
    pub skipped: u32,
}

/// The separator that occurs most often in the text, `;` on ties.
pub fn detect_delimiter(text: &str) -> u8 {
    let count = |d: u8| text.bytes().filter(|&b| b == d).count();
    let mut best = (b';', count(b';'));
    for d in [b',', b'\t'] {
        let n = count(d);
        if n > best.1 {
            best = (d, n);
        }
    }
    best.0
}

/// `DD/MM/YYYY`, `YYYY-MM-DD` or `DD-MM-YYYY`, trailing text allowed; `today` otherwise.
pub fn parse_date(raw: &str, today: NaiveDate) -> NaiveDate {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_and_remainder(raw, fmt).ok().map(|(d, _)| d))
        .unwrap_or(today)
}

fn is_header(fields: &[&str]) -> bool {
    fields.iter().any(|f| {
        let f = f.to_lowercase();
        f.contains("concurso") || f.contains("data")
    })
}

fn parse_numbers(fields: &[&str]) -> Option<[u8; PICK_COUNT]> {
    let parsed: Vec<u8> = fields
        .iter()
        .filter_map(|f| f.parse::<u8>().ok())
        .filter(|&n| is_in_pool(n))
        .collect();
    if parsed.len() != PICK_COUNT || validate_numbers(&parsed).is_err() {
        return None;
    }
    let mut numbers = [0u8; PICK_COUNT];
    numbers.copy_from_slice(&parsed);
    numbers.sort_unstable();
    Some(numbers)
}

/// Row shapes: `number, date, n1..n6` (7+ fields) or bare `n1..n6` (6 fields),
/// the latter numbered by its line and dated `today`.
fn parse_row(fields: &[&str], line: u64, today: NaiveDate) -> Option<Draw> {
    if fields.len() >= PICK_COUNT + 1 {
        let draw_number = fields[0].parse::<u32>().ok()?;
        let end = fields.len().min(PICK_COUNT + 2);
        let numbers = parse_numbers(&fields[2..end])?;
        Some(Draw::new(draw_number, parse_date(fields[1], today), numbers))
    } else if fields.len() == PICK_COUNT {
        let numbers = parse_numbers(fields)?;
        Some(Draw::new(line as u32, today, numbers))
    } else {
        None
    }
}

pub fn parse_csv(text: &str, today: NaiveDate) -> Result<ParseResult> {
    let delimiter = detect_delimiter(text);
    debug!(delimiter = %(delimiter as char).escape_default(), "delimiter detected");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut result = ParseResult::default();

    for record in reader.records() {
        let record = record.context("Unreadable CSV record")?;
        // Runs of separators collapse, and stray separators of another kind still split.
        let fields: Vec<&str> = record
            .iter()
            .flat_map(|f| f.split(SEPARATORS))
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        if fields.is_empty() {
            continue;
        }
        if is_header(&fields) {
            result.headers += 1;
            continue;
        }

        result.rows += 1;
        let line = record.position().map(|p| p.line()).unwrap_or(u64::from(result.rows));
        match parse_row(&fields, line, today) {
            Some(draw) => result.draws.push(draw),
            None => {
                debug!(line, "row dropped");
                result.dropped += 1;
            }
        }
    }

    Ok(result)
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {:?}", path))?;
    let today = chrono::Local::now().date_naive();
    let parsed = parse_csv(&text, today)?;

    info!(rows = parsed.rows, parsed = parsed.draws.len(), dropped = parsed.dropped, "csv parsed");

    let bulk = bulk_create(conn, &parsed.draws)?;
    Ok(ImportResult {
        rows: parsed.rows,
        parsed: parsed.draws.len() as u32,
        dropped: parsed.dropped,
        inserted: bulk.inserted,
        skipped: bulk.skipped,
    })
}
