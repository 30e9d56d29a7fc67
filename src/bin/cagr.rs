use anyhow::{Context, Result};
use cagr_rs::{Dataset, Selection, YearRange};
use cagr_rs::{query, stats, storage};
use clap::{Args, Parser, Subcommand, ValueEnum};
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cagr",
    version,
    about = "Load, rank & export per-country indicator growth data"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a window of the dataset (and optionally save the filtered table).
    Report(ReportArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Long-format CSV with country, year, and value columns.
    #[arg(short, long)]
    input: PathBuf,
    /// Countries separated by comma or semicolon (default: every country in the dataset).
    #[arg(short, long)]
    countries: Option<String>,
    /// Year window as YYYY:YYYY or a single YYYY (default: the dataset's full span).
    #[arg(short, long)]
    years: Option<String>,
    /// How many countries to show in the CAGR ranking.
    #[arg(long, default_value_t = 10)]
    top_n: usize,
    /// Save the filtered table to a file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print the latest-year snapshot rows.
    #[arg(long, default_value_t = false)]
    snapshot: bool,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn parse_years(s: &str) -> Option<YearRange> {
    if let Some((a, b)) = s.split_once(':') {
        let start = a.trim().parse::<i32>().ok()?;
        let end = b.trim().parse::<i32>().ok()?;
        Some(YearRange::new(start, end))
    } else {
        let y = s.trim().parse::<i32>().ok()?;
        Some(YearRange::new(y, y))
    }
}

fn fmt_pct(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.2}%", x),
        _ => "NA".to_string(),
    }
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        (v.round() as i64).to_formatted_string(&Locale::en)
    } else {
        format!("{:.2}", v)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Report(args) => cmd_report(args),
    }
}

fn cmd_report(args: ReportArgs) -> Result<()> {
    let data = Dataset::from_path(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;
    log::info!(
        "loaded {} rows from {} ({} dropped)",
        data.rows().len(),
        data.source(),
        data.dropped()
    );

    let countries = match &args.countries {
        Some(s) => parse_list(s),
        None => data.countries().map(str::to_string).collect(),
    };
    let years = match &args.years {
        Some(s) => parse_years(s)
            .ok_or_else(|| anyhow::anyhow!("invalid --years, expected YYYY or YYYY:YYYY"))?,
        None => data
            .year_range()
            .ok_or_else(|| anyhow::anyhow!("dataset has no rows"))?,
    };
    let selection = Selection::new(countries, years);

    let window = data.select(&selection);
    let results = stats::cagr_by_country(&window);
    let ranked = stats::top_n(&results, args.top_n);
    let summary = stats::summary(&results);
    let latest = query::latest_year(&window);

    println!("Countries selected: {}", selection.countries.len());
    println!("Year range:         {} - {}", years.start, years.end);
    println!(
        "Average CAGR:       {}",
        fmt_pct(summary.mean.map(|m| m * 100.0))
    );
    println!(
        "Latest year:        {}",
        latest.map_or_else(|| "NA".to_string(), |y| y.to_string())
    );
    println!();

    if ranked.is_empty() {
        println!("No country has a defined CAGR in this window.");
    } else {
        println!("Top {} by CAGR:", ranked.len());
        for (i, r) in ranked.iter().enumerate() {
            println!("{:>3}. {:<24} {}", i + 1, r.country, fmt_pct(Some(r.cagr * 100.0)));
        }
    }

    if args.snapshot {
        println!();
        match latest {
            Some(y) => {
                println!("Snapshot ({y}):");
                for r in query::snapshot(&window) {
                    println!("  {:<24} {}", r.country, fmt_value(r.value));
                }
            }
            None => println!("Snapshot: no rows in window."),
        }
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&window, path)?,
            "json" => storage::save_json(&window, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", window.len(), path.display());
    }

    Ok(())
}
