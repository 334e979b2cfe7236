mod display;
mod import;
mod logging;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use megasena_analysis::generator::{generate, make_rng};
use megasena_analysis::{GeneratorConfig, Strategy, frequency, gaps, summarize};
use megasena_db::db::{
    DrawOrder, MAX_LIST, count_draws, db_path, delete_all, delete_draw, list_draws, migrate,
    open_db,
};
use megasena_db::models::{Draw, PICK_COUNT, is_in_pool};
use megasena_db::rusqlite::Connection;

use crate::display::{
    display_combinations, display_draws, display_import_summary, display_summary,
};

const EMPTY_DB: &str = "Empty database. Run first: megasena import --file <draws.csv>";

#[derive(Debug, Parser)]
#[command(name = "megasena", about = "Mega-Sena draw statistics and combination generator")]
struct Cli {
    /// SQLite database path (default: data/megasena.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import draws from a CSV file
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the database path
    DbPath,

    /// List the most recent draws
    List {
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Frequency, distribution and gap statistics
    Stats {
        /// Number of most recent draws analyzed (default: all)
        #[arg(short, long)]
        window: Option<u32>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate combinations
    Generate {
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,

        #[arg(short, long)]
        count: Option<usize>,

        /// Even/odd split, e.g. 3/3
        #[arg(long, value_parser = parse_split)]
        even_odd: Option<(u8, u8)>,

        /// Low/high split, e.g. 2/4
        #[arg(long, value_parser = parse_split)]
        low_high: Option<(u8, u8)>,

        #[arg(long)]
        sum_min: Option<u32>,

        #[arg(long)]
        sum_max: Option<u32>,

        /// Numbers never used, comma separated
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<u8>>,

        /// Numbers tried first, comma separated
        #[arg(long, value_delimiter = ',')]
        prefer: Option<Vec<u8>>,

        /// Monte Carlo attempts per combination
        #[arg(long)]
        simulations: Option<usize>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// JSON generator config; flags given on the command line win
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of most recent draws analyzed (default: all)
        #[arg(short, long)]
        window: Option<u32>,
    },

    /// Delete one draw
    Delete { draw_number: u32 },

    /// Delete every draw
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Flags of `generate`, applied over the config file.
#[derive(Debug, Default)]
struct GenerateOverrides {
    strategy: Option<Strategy>,
    count: Option<usize>,
    even_odd: Option<(u8, u8)>,
    low_high: Option<(u8, u8)>,
    sum_min: Option<u32>,
    sum_max: Option<u32>,
    exclude: Option<Vec<u8>>,
    prefer: Option<Vec<u8>>,
    simulations: Option<usize>,
    seed: Option<u64>,
}

impl GenerateOverrides {
    fn apply(self, config: &mut GeneratorConfig) {
        if let Some(v) = self.strategy {
            config.strategy = v;
        }
        if let Some(v) = self.count {
            config.count = v;
        }
        if let Some((even, odd)) = self.even_odd {
            config.even = even;
            config.odd = odd;
        }
        if let Some((low, high)) = self.low_high {
            config.low = low;
            config.high = high;
        }
        if let Some(v) = self.sum_min {
            config.sum_min = v;
        }
        if let Some(v) = self.sum_max {
            config.sum_max = v;
        }
        if let Some(v) = self.exclude {
            config.exclude = v;
        }
        if let Some(v) = self.prefer {
            config.prefer = v;
        }
        if let Some(v) = self.simulations {
            config.simulations = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let path = cli.db.unwrap_or_else(db_path);
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window, json } => cmd_stats(&conn, window, json),
        Command::Generate {
            strategy,
            count,
            even_odd,
            low_high,
            sum_min,
            sum_max,
            exclude,
            prefer,
            simulations,
            seed,
            config,
            window,
        } => {
            let overrides = GenerateOverrides {
                strategy,
                count,
                even_odd,
                low_high,
                sum_min,
                sum_max,
                exclude,
                prefer,
                simulations,
                seed,
            };
            let config = load_config(config.as_deref(), overrides)?;
            cmd_generate(&conn, &config, window)
        }
        Command::Delete { draw_number } => cmd_delete(&conn, draw_number),
        Command::Clear { yes } => cmd_clear(&conn, yes),
    }
}

/// Parses an `a/b` split. Whether it is satisfiable is left to the generator.
fn parse_split(raw: &str) -> Result<(u8, u8), String> {
    let (a, b) = raw
        .split_once('/')
        .ok_or_else(|| format!("expected a/b, got {:?}", raw))?;
    let a: u8 = a.trim().parse().map_err(|_| format!("invalid count {:?}", a))?;
    let b: u8 = b.trim().parse().map_err(|_| format!("invalid count {:?}", b))?;
    Ok((a, b))
}

fn load_config(path: Option<&Path>, overrides: GenerateOverrides) -> Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read config {:?}", path))?;
            GeneratorConfig::from_json(&text)
                .with_context(|| format!("Invalid config {:?}", path))?
        }
        None => GeneratorConfig::default(),
    };
    overrides.apply(&mut config);

    for &n in config.exclude.iter().chain(&config.prefer) {
        if !is_in_pool(n) {
            warn!(number = n, "ignored, outside 1-60");
        }
    }
    let covers_pick = |a: u8, b: u8| usize::from(a) + usize::from(b) == PICK_COUNT;
    if !covers_pick(config.even, config.odd) || !covers_pick(config.low, config.high) {
        warn!(
            even = config.even,
            odd = config.odd,
            low = config.low,
            high = config.high,
            "split does not cover {} numbers, balanced generation will fall back",
            PICK_COUNT
        );
    }
    Ok(config)
}

/// Draws analyzed by `stats` and `generate`: the `window` most recent, or all.
fn load_history(conn: &Connection, window: Option<u32>) -> Result<Vec<Draw>> {
    let limit = window.unwrap_or(MAX_LIST);
    list_draws(conn, DrawOrder::NumberDesc, limit)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB}");
        return Ok(());
    }
    let draws = list_draws(conn, DrawOrder::NumberDesc, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: Option<u32>, json: bool) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB}");
        return Ok(());
    }
    let draws = load_history(conn, window)?;
    let summary = summarize(&draws);
    info!(draws = draws.len(), "statistics computed");

    if json {
        let out = serde_json::to_string_pretty(&summary).context("Cannot serialize summary")?;
        println!("{out}");
    } else {
        display_summary(&summary, draws.len() as u32);
    }
    Ok(())
}

fn cmd_generate(conn: &Connection, config: &GeneratorConfig, window: Option<u32>) -> Result<()> {
    let draws = load_history(conn, window)?;
    if draws.is_empty() && config.strategy != Strategy::Balanced {
        println!("{EMPTY_DB}");
        return Ok(());
    }

    let frequency = frequency::frequency(&draws);
    let gaps = gaps::gap_stats(&draws, true);
    let mut rng = make_rng(config.seed);
    let combinations = generate(config, &frequency, &gaps, &mut rng);
    info!(strategy = ?config.strategy, generated = combinations.len(), "combinations generated");

    display_combinations(&combinations);
    Ok(())
}

fn cmd_delete(conn: &Connection, draw_number: u32) -> Result<()> {
    if delete_draw(conn, draw_number)? {
        println!("Draw {} deleted.", draw_number);
    } else {
        println!("Draw {} not found.", draw_number);
    }
    Ok(())
}

fn cmd_clear(conn: &Connection, yes: bool) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Database already empty.");
        return Ok(());
    }
    if !yes {
        let confirm = prompt(&format!("Delete all {} draws? (y/n): ", n))?;
        if confirm.to_lowercase() != "y" {
            println!("Cancelled.");
            return Ok(());
        }
    }
    let deleted = delete_all(conn)?;
    println!("{} draws deleted.", deleted);
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Cannot read from stdin")?;
    Ok(input.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_split() {
        assert_eq!(parse_split("3/3"), Ok((3, 3)));
        assert_eq!(parse_split(" 2 / 4 "), Ok((2, 4)));
        assert!(parse_split("3-3").is_err());
        assert!(parse_split("a/6").is_err());
    }

    #[test]
    fn test_unsatisfiable_split_reaches_generator() {
        assert_eq!(parse_split("3/5"), Ok((3, 5)));
        let overrides = GenerateOverrides {
            even_odd: Some((3, 5)),
            low_high: Some((3, 9)),
            ..GenerateOverrides::default()
        };
        let config = load_config(None, overrides).unwrap();
        assert_eq!((config.even, config.odd), (3, 5));
        assert_eq!((config.low, config.high), (3, 9));

        let combos = generate(
            &config,
            &frequency::FrequencyTable::empty(),
            &gaps::gap_stats(&[], true),
            &mut make_rng(Some(3)),
        );
        assert!(combos.iter().all(|c| c.is_fallback()));
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"strategy": "overdue", "count": 2, "sum_min": 100}}"#).unwrap();

        let overrides = GenerateOverrides {
            count: Some(7),
            even_odd: Some((2, 4)),
            ..GenerateOverrides::default()
        };
        let config = load_config(Some(file.path()), overrides).unwrap();
        assert_eq!(config.strategy, Strategy::Overdue);
        assert_eq!(config.count, 7);
        assert_eq!(config.sum_min, 100);
        assert_eq!((config.even, config.odd), (2, 4));
        assert_eq!(config.sum_max, 220);
    }

    #[test]
    fn test_out_of_range_exclusion_kept_for_generator() {
        let overrides = GenerateOverrides {
            exclude: Some(vec![5, 61]),
            ..GenerateOverrides::default()
        };
        let config = load_config(None, overrides).unwrap();
        assert_eq!(config.exclude, vec![5, 61]);
    }

    #[test]
    fn test_missing_config_file() {
        let path = Path::new("/nonexistent/generator.json");
        assert!(load_config(Some(path), GenerateOverrides::default()).is_err());
    }

    #[test]
    fn test_generate_arguments_parse() {
        let cli = Cli::try_parse_from([
            "megasena", "--db", "/tmp/x.db", "generate", "-s", "monte-carlo", "--exclude", "1,2,3",
            "--even-odd", "4/2", "--seed", "9",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Command::Generate { strategy, exclude, even_odd, seed, .. } => {
                assert_eq!(strategy, Some(Strategy::MonteCarlo));
                assert_eq!(exclude, Some(vec![1, 2, 3]));
                assert_eq!(even_odd, Some((4, 2)));
                assert_eq!(seed, Some(9));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_load_history_window() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let day = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for n in 1..=5 {
            megasena_db::db::insert_draw(&conn, &Draw::new(n, day, [1, 2, 3, 4, 5, 6])).unwrap();
        }
        assert_eq!(load_history(&conn, Some(3)).unwrap().len(), 3);
        assert_eq!(load_history(&conn, None).unwrap().len(), 5);
    }
}
