// Group booking sales notice generator
// Reads OCR text, extracts the booking, prints a review table and the notice

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use tuanfang::{BookingRecord, Config, ExtractionError, NoticeError, NoticeGenerator};

#[derive(Parser)]
#[command(name = "tuanfang", version, about = "Turn OCR'd group bookings into sales notices")]
struct Cli {
    /// JSON configuration file; built-in defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a booking record from OCR text and print it as JSON
    Extract {
        /// OCR text file, or `-` for stdin
        input: PathBuf,
    },
    /// Render the notice for a (possibly edited) record JSON file
    Notify {
        /// Record JSON file, or `-` for stdin
        record: PathBuf,
    },
    /// Extract and render in one go
    Run {
        /// OCR text file, or `-` for stdin
        input: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String, NoticeError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| NoticeError::Io(format!("stdin: {}", e)))?;
        return Ok(buffer);
    }
    fs::read_to_string(path).map_err(|e| NoticeError::Io(format!("{}: {}", path.display(), e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, NoticeError> {
    serde_json::to_string_pretty(value).map_err(|e| NoticeError::RecordFormat(e.to_string()))
}

// Review table for the record, one row per room line item
fn print_record(record: &BookingRecord) {
    println!("\n===============================================");
    println!("      GROUP BOOKING");
    println!("===============================================\n");
    println!("  Team: {}", record.team_identifier);
    println!("  Category: {}", record.team_category);
    println!(
        "  Arrival: {}",
        record.arrival_phrase().unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  Departure: {}",
        record.departure_phrase().unwrap_or_else(|| "-".to_string())
    );
    println!("\n  {:<8} {:>6} {:>8}", "TYPE", "ROOMS", "PRICE");
    for row in record.table_rows() {
        println!("  {:<8} {:>6} {:>8}", row.room_type, row.count, row.unit_price);
    }
    println!();
}

fn report_failure(err: &ExtractionError) {
    eprintln!("Extraction failed ({}): {}", err.kind(), err);
    if let Some(partial) = err.partial_record() {
        if let Ok(json) = to_json(&partial) {
            eprintln!("Partial record for manual entry:\n{}", json);
        }
    }
}

fn run(cli: Cli) -> Result<(), NoticeError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let generator = NoticeGenerator::new(config);

    match cli.command {
        Command::Extract { input } => {
            let text = read_input(&input)?;
            let record = generator.extract(&text)?;
            println!("{}", to_json(&record)?);
        }
        Command::Notify { record } => {
            let json = read_input(&record)?;
            let record: BookingRecord = serde_json::from_str(&json)
                .map_err(|e| NoticeError::RecordFormat(e.to_string()))?;
            println!("{}", generator.notify(&record));
        }
        Command::Run { input } => {
            let text = read_input(&input)?;
            let record = generator.extract(&text)?;
            print_record(&record);
            println!("{}", generator.notify(&record));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(NoticeError::Extraction(err)) => {
            report_failure(&err);
            ExitCode::from(2)
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
