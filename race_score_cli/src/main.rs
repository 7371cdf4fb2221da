use std::fs;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use race_score::{
    list_events, load_overrides, parse_time_parts, Backend, Gender, RaceResult, ScoreTables, Venue,
};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Race performance scoring CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a single race result
    Score(ScoreArgs),
    /// Score a CSV of race results
    Batch(BatchArgs),
    /// List canonical events, their backends, and registered labels
    Events(EventsArgs),
}

#[derive(Parser, Debug)]
struct ScoreArgs {
    /// Distance label, e.g. "5K" or "Media maratón"
    #[arg(long)]
    distance: String,

    /// Elapsed time (h:mm:ss, mm:ss, or bare seconds)
    #[arg(long)]
    time: String,

    /// Gender category
    #[arg(long, value_enum, default_value_t = GenderOpt::Men)]
    gender: GenderOpt,

    /// Venue flag
    #[arg(long, value_enum, default_value_t = VenueOpt::Road)]
    venue: VenueOpt,

    /// Optional JSON table overrides
    #[arg(long, value_hint = ValueHint::FilePath)]
    tables: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input CSV with distance,time,gender,venue rows
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = "points.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Optional JSON table overrides
    #[arg(long, value_hint = ValueHint::FilePath)]
    tables: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct EventsArgs {
    /// Verbose logging
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GenderOpt {
    Men,
    Women,
}

impl From<GenderOpt> for Gender {
    fn from(value: GenderOpt) -> Self {
        match value {
            GenderOpt::Men => Gender::Men,
            GenderOpt::Women => Gender::Women,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum VenueOpt {
    Indoor,
    Outdoor,
    Road,
}

impl From<VenueOpt> for Venue {
    fn from(value: VenueOpt) -> Self {
        match value {
            VenueOpt::Indoor => Venue::Indoor,
            VenueOpt::Outdoor => Venue::Outdoor,
            VenueOpt::Road => Venue::RoadOrUnspecified,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match &cli.command {
        Command::Score(args) if args.verbose => "debug",
        Command::Batch(args) if args.verbose => "debug",
        Command::Events(args) if args.verbose => "debug",
        _ => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Score(args) => handle_score(args),
        Command::Batch(args) => handle_batch(args),
        Command::Events(_) => handle_events(),
    }
}

fn build_tables(overrides_path: Option<&PathBuf>) -> Result<ScoreTables> {
    let tables = ScoreTables::reference();
    match overrides_path {
        Some(path) => {
            let overrides = load_overrides(path)
                .with_context(|| format!("failed to load overrides from {}", path.display()))?;
            info!(
                "Loaded {} table overrides (sha256 {})",
                overrides.len(),
                &overrides.source_hash[..12]
            );
            Ok(tables.with_overrides(&overrides))
        }
        None => Ok(tables),
    }
}

fn handle_score(args: ScoreArgs) -> Result<()> {
    let (hours, minutes, seconds) = parse_time_parts(&args.time)
        .ok_or_else(|| anyhow!("unparseable time token: {}", args.time))?;
    let result = RaceResult {
        distance_label: args.distance.clone(),
        hours,
        minutes,
        seconds,
        gender: args.gender.into(),
        venue: args.venue.into(),
    };

    let tables = build_tables(args.tables.as_ref())?;
    let points = tables.score(&result)?;
    println!("{points}");
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<()> {
    let data = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let tables = build_tables(args.tables.as_ref())?;

    let rows: Vec<(usize, &str)> = data
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("distance,"))
        .collect();

    let scored: Vec<(String, bool)> = rows
        .par_iter()
        .map(|&(line_no, line)| match parse_row(line) {
            Ok(result) => match tables.score(&result) {
                Ok(points) => (format!("{line},{points},"), true),
                Err(err) => (format!("{line},,{err}"), false),
            },
            Err(reason) => (format!("{line},,line {line_no}: {reason}"), false),
        })
        .collect();

    let mut out: Box<dyn Write> = if args.output.as_os_str() == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(
            File::create(&args.output)
                .with_context(|| format!("failed to create {}", args.output.display()))?,
        )
    };
    writeln!(out, "distance,time,gender,venue,points,reason")?;
    for (row, _) in &scored {
        writeln!(out, "{row}")?;
    }

    let unscorable = scored.iter().filter(|(_, ok)| !ok).count();
    if unscorable > 0 {
        warn!("{unscorable} of {} rows were unscorable", scored.len());
    }
    if args.output.as_os_str() != "-" {
        info!(
            "Wrote {} scored rows to {}",
            scored.len(),
            args.output.display()
        );
    }
    Ok(())
}

fn handle_events() -> Result<()> {
    println!(
        "{:<20} {:<11} {:<10} {}",
        "key", "backend", "indoor", "labels"
    );
    for event in list_events() {
        let backend = match event.backend {
            Backend::Parametric => "parametric",
            Backend::Tabular => "tabular",
        };
        println!(
            "{:<20} {:<11} {:<10} {}",
            event.key,
            backend,
            event.indoor_variant.as_deref().unwrap_or("-"),
            event.labels.join(", "),
        );
    }
    Ok(())
}

/// Parse one `distance,time,gender,venue` CSV row. The venue field may be
/// empty; the distance label is taken verbatim (labels contain no commas).
fn parse_row(line: &str) -> Result<RaceResult, String> {
    let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
    let &[distance, time, gender, venue] = fields.as_slice() else {
        return Err(format!("expected 4 fields, got {}", fields.len()));
    };
    let (hours, minutes, seconds) =
        parse_time_parts(time).ok_or_else(|| format!("unparseable time token: {time}"))?;
    let gender =
        Gender::from_key(gender).ok_or_else(|| format!("unknown gender token: {gender}"))?;
    let venue = venue_from_token(venue)?;
    Ok(RaceResult {
        distance_label: distance.to_string(),
        hours,
        minutes,
        seconds,
        gender,
        venue,
    })
}

fn venue_from_token(token: &str) -> Result<Venue, String> {
    match token {
        "" | "road" => Ok(Venue::RoadOrUnspecified),
        "indoor" => Ok(Venue::Indoor),
        "outdoor" => Ok(Venue::Outdoor),
        other => Err(format!("unknown venue token: {other}")),
    }
}
