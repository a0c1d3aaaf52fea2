//! hdrift CLI - Command-line interface for h-drift
//!
//! Commands:
//! - pairs: Build the preference-pair feature table
//! - requests: Build the politeness-request feature table
//! - summarize: Print descriptive statistics for a feature table
//! - lexicon: Print the default H-class lexicon
//! - doctor: Diagnose configuration and inputs

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use h_drift::features::DriftEngine;
use h_drift::lexicon::HClassLexicon;
use h_drift::metrics::{Describe, SummaryReport};
use h_drift::pipeline::{
    pairs_to_features, requests_to_features, summarize_features, PairInputFormat,
};
use h_drift::sources::{PairAdapter, RequestTable};
use h_drift::table::{write_table, write_table_to, TableFormat};
use h_drift::{DriftError, HDRIFT_VERSION, PRODUCER_NAME};

/// hdrift - Lexical drift feature engine
#[derive(Parser)]
#[command(name = "hdrift")]
#[command(version = HDRIFT_VERSION)]
#[command(about = "Compute H-class drift features over text corpora", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the preference-pair feature table (two rows per pair)
    Pairs {
        /// Input export file (NDJSON or JSON array of pair records)
        #[arg(short, long)]
        input: PathBuf,

        /// Output feature table path
        #[arg(short, long)]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format (inferred from the output extension when omitted)
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// Build the politeness-request feature table (one row per record)
    Requests {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output feature table path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (inferred from the output extension when omitted)
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },

    /// Summarize a feature table (drift index + descriptive statistics)
    Summarize {
        /// Feature table path
        #[arg(short, long)]
        input: PathBuf,

        /// Table format (inferred from the extension when omitted)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output the report as pretty JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default H-class lexicon
    Lexicon {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and inputs
    Doctor {
        /// Feature table or source file to check
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one pair per line)
    Ndjson,
    /// JSON array of pairs
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Newline-delimited JSON (one row per line)
    Ndjson,
}

impl From<OutputFormat> for TableFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Csv => TableFormat::Csv,
            OutputFormat::Ndjson => TableFormat::Ndjson,
        }
    }
}

fn resolve_format(explicit: Option<OutputFormat>, path: &Path) -> TableFormat {
    explicit.map(TableFormat::from).unwrap_or_else(|| TableFormat::infer(path))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HdriftCliError> {
    match cli.command {
        Commands::Pairs {
            input,
            output,
            input_format,
            output_format,
        } => cmd_pairs(&input, &output, input_format, output_format),

        Commands::Requests {
            input,
            output,
            output_format,
        } => cmd_requests(&input, &output, output_format),

        Commands::Summarize {
            input,
            format,
            json,
        } => cmd_summarize(&input, format, json),

        Commands::Lexicon { json } => cmd_lexicon(json),

        Commands::Doctor { input, json } => cmd_doctor(input.as_deref(), json),
    }
}

fn cmd_pairs(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: Option<OutputFormat>,
) -> Result<(), HdriftCliError> {
    let engine = DriftEngine::new();
    let table_format = resolve_format(output_format, output);

    if is_stdio(input) || is_stdio(output) {
        // Stream through stdin/stdout without touching the filesystem
        let data = if is_stdio(input) {
            read_stdin()?
        } else {
            if !input.exists() {
                return Err(DriftError::MissingInput(input.to_path_buf()).into());
            }
            std::fs::read_to_string(input).map_err(DriftError::from)?
        };
        let pairs = match input_format {
            InputFormat::Ndjson => PairAdapter::parse_ndjson(&data)?,
            InputFormat::Json => PairAdapter::parse_array(&data)?,
        };
        let rows = engine.build_pair_table(pairs);
        write_rows(output, &rows, table_format)?;
        report_written(output, rows.len());
        return Ok(());
    }

    let pair_format = match input_format {
        InputFormat::Ndjson => PairInputFormat::Ndjson,
        InputFormat::Json => PairInputFormat::Json,
    };
    let written = pairs_to_features(input, output, pair_format, table_format, &engine)?;
    report_written(output, written);
    Ok(())
}

fn cmd_requests(
    input: &Path,
    output: &Path,
    output_format: Option<OutputFormat>,
) -> Result<(), HdriftCliError> {
    let engine = DriftEngine::new();
    let table_format = resolve_format(output_format, output);

    if is_stdio(input) || is_stdio(output) {
        let table = if is_stdio(input) {
            RequestTable::from_csv_reader(io::stdin().lock())?
        } else {
            RequestTable::from_csv_path(input)?
        };
        let records = table.resolve_records()?;
        let rows = engine.build_request_table(&records);
        write_rows(output, &rows, table_format)?;
        report_written(output, rows.len());
        return Ok(());
    }

    let written = requests_to_features(input, output, table_format, &engine)?;
    report_written(output, written);
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

fn read_stdin() -> Result<String, HdriftCliError> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(DriftError::from)?;
    Ok(buffer)
}

fn write_rows<T: serde::Serialize>(
    output: &Path,
    rows: &[T],
    format: TableFormat,
) -> Result<(), HdriftCliError> {
    if is_stdio(output) {
        write_table_to(io::stdout().lock(), rows, format)?;
    } else {
        write_table(output, rows, format)?;
    }
    Ok(())
}

fn report_written(output: &Path, rows: usize) {
    if !is_stdio(output) {
        println!("Wrote {} rows to {}", rows, output.display());
    }
}

fn cmd_summarize(
    input: &Path,
    format: Option<OutputFormat>,
    json: bool,
) -> Result<(), HdriftCliError> {
    let table_format = resolve_format(format, input);
    let report = summarize_features(input, table_format)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

fn cmd_lexicon(json: bool) -> Result<(), HdriftCliError> {
    let lexicon = HClassLexicon::default();

    if json {
        println!("{}", serde_json::to_string_pretty(&lexicon)?);
    } else {
        println!("H-class lexicon ({} phrases)", lexicon.phrase_count());
        println!("==============================");
        for (class, phrases) in lexicon.entries() {
            println!("\n{} ({} phrases):", class.as_str(), phrases.len());
            println!("  {}", phrases.join(", "));
        }
    }
    Ok(())
}

fn cmd_doctor(input: Option<&Path>, json: bool) -> Result<(), HdriftCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "hdrift_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("h-drift version {}", HDRIFT_VERSION),
    });

    // Lexicon integrity: five classes, nonempty lowercase phrase lists
    let lexicon = HClassLexicon::default();
    let mut lexicon_problems = Vec::new();
    for (class, phrases) in lexicon.entries() {
        if phrases.is_empty() {
            lexicon_problems.push(format!("{} has no phrases", class.as_str()));
        }
        if phrases.iter().any(|p| p != &p.to_lowercase()) {
            lexicon_problems.push(format!("{} has non-lowercase phrases", class.as_str()));
        }
    }
    checks.push(if lexicon_problems.is_empty() {
        DoctorCheck {
            name: "lexicon".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Default lexicon valid ({} classes, {} phrases)",
                h_drift::lexicon::HClass::ALL.len(),
                lexicon.phrase_count()
            ),
        }
    } else {
        DoctorCheck {
            name: "lexicon".to_string(),
            status: CheckStatus::Error,
            message: lexicon_problems.join("; "),
        }
    });

    // Input file check
    if let Some(path) = input {
        checks.push(if path.exists() {
            let empty = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(false);
            if empty {
                DoctorCheck {
                    name: "input".to_string(),
                    status: CheckStatus::Warning,
                    message: format!("{} exists but is empty", path.display()),
                }
            } else {
                DoctorCheck {
                    name: "input".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "{} exists (format: {})",
                        path.display(),
                        match TableFormat::infer(path) {
                            TableFormat::Csv => "csv",
                            TableFormat::Ndjson => "ndjson",
                        }
                    ),
                }
            }
        } else {
            DoctorCheck {
                name: "input".to_string(),
                status: CheckStatus::Error,
                message: format!("{} does not exist", path.display()),
            }
        });
    }

    // stdin mode
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: HDRIFT_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("hdrift Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HdriftCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Report rendering

fn render_report(report: &SummaryReport) {
    println!("=== Overall H-drift summary ===");
    println!("rows: {}\n", report.rows);

    println!(
        "{:<14} {:>7} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for column in &report.columns {
        println!("{:<14} {}", column.column, render_stats(&column.stats));
    }

    if let Some(groups) = &report.by_label {
        println!("\n=== drift_index by label ===");
        println!(
            "{:<14} {:>7} {:>10} {:>10} {:>8} {:>8} {:>8} {:>8} {:>8}",
            "label", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        );
        for group in groups {
            println!("{:<14} {}", group.label, render_stats(&group.stats));
        }
    }
}

fn render_stats(stats: &Describe) -> String {
    fn cell(value: Option<f64>, width: usize) -> String {
        match value {
            Some(v) => format!("{:>width$.4}", v, width = width),
            None => format!("{:>width$}", "-", width = width),
        }
    }

    format!(
        "{:>7} {} {} {} {} {} {} {}",
        stats.count,
        cell(stats.mean, 10),
        cell(stats.std, 10),
        cell(stats.min, 8),
        cell(stats.q25, 8),
        cell(stats.median, 8),
        cell(stats.q75, 8),
        cell(stats.max, 8),
    )
}

// Error types

#[derive(Debug)]
enum HdriftCliError {
    Drift(DriftError),
    Json(serde_json::Error),
    DoctorFailed,
}

impl From<DriftError> for HdriftCliError {
    fn from(e: DriftError) -> Self {
        HdriftCliError::Drift(e)
    }
}

impl From<serde_json::Error> for HdriftCliError {
    fn from(e: serde_json::Error) -> Self {
        HdriftCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HdriftCliError> for CliError {
    fn from(e: HdriftCliError) -> Self {
        match e {
            HdriftCliError::Drift(e) => {
                let (code, hint) = match &e {
                    DriftError::MissingInput(_) => (
                        "MISSING_INPUT",
                        "Check the input path; dataset files must exist locally",
                    ),
                    DriftError::NoTextColumn { .. } => (
                        "NO_TEXT_COLUMN",
                        "Rename the request column to one of the accepted names",
                    ),
                    DriftError::MissingColumn(_) => (
                        "MISSING_COLUMN",
                        "Summarize expects a table produced by 'hdrift pairs' or 'hdrift requests'",
                    ),
                    DriftError::ParseError(_) => {
                        ("PARSE_ERROR", "Check the input format and record shape")
                    }
                    DriftError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    DriftError::CsvError(_) => ("CSV_ERROR", "Check CSV structure"),
                    DriftError::IoError(_) => ("IO_ERROR", "Check file paths and permissions"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            HdriftCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HdriftCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
