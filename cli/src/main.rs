//! sheetcheck CLI - spreadsheet upload validation tool

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sheetcheck::{
    render, Error, ExportOptions, JsonFormat, Schema, Session, SessionEvent, Upload,
    ValidationOutcome,
};

/// Exit status for an upload with diagnostics.
const EXIT_INVALID: i32 = 2;

#[derive(Parser)]
#[command(name = "sheetcheck")]
#[command(version)]
#[command(about = "Validate spreadsheet uploads against a JSON-Schema", long_about = None)]
struct Cli {
    /// Input .xlsx or .csv file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Sheet to validate
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Row schema (bundled water-sample schema if not specified)
    #[arg(long, value_name = "PATH", env = "SHEETCHECK_SCHEMA")]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a file and print its diagnostics
    #[command(alias = "check")]
    Validate {
        /// Input .xlsx or .csv file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Sheet to validate
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        /// Row schema (bundled water-sample schema if not specified)
        #[arg(long, value_name = "PATH", env = "SHEETCHECK_SCHEMA")]
        schema: Option<PathBuf>,

        /// Write the diagnostics as CSV ("<FILE> errors.csv" if no path is given)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List the sheets of a file
    Sheets {
        /// Input .xlsx or .csv file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the bundled schema
    Schema {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Status line and aligned diagnostics table
    Table,
    /// Outcome as pretty-printed JSON
    Json,
}

struct ValidateArgs<'a> {
    input: &'a Path,
    sheet: Option<&'a str>,
    schema: Option<&'a Path>,
    export: Option<Option<&'a Path>>,
    format: OutputFormat,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Validate {
            input,
            sheet,
            schema,
            export,
            format,
        }) => cmd_validate(ValidateArgs {
            input: &input,
            sheet: sheet.as_deref(),
            schema: schema.as_deref(),
            export: export.as_ref().map(|path| path.as_deref()),
            format,
        }),
        Some(Commands::Sheets { input }) => cmd_sheets(&input).map(|_| 0),
        Some(Commands::Schema { output }) => cmd_schema(output.as_deref()).map(|_| 0),
        Some(Commands::Version) => {
            cmd_version();
            Ok(0)
        }
        None => {
            // Default behavior: validate if input is provided
            if let Some(input) = cli.input {
                cmd_validate(ValidateArgs {
                    input: &input,
                    sheet: cli.sheet.as_deref(),
                    schema: cli.schema.as_deref(),
                    export: None,
                    format: OutputFormat::Table,
                })
            } else {
                println!("{}", "Usage: sheetcheck <FILE>".yellow());
                println!("       sheetcheck --help for more information");
                Ok(0)
            }
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn cmd_validate(args: ValidateArgs<'_>) -> Result<i32, Box<dyn std::error::Error>> {
    let schema = match args.schema {
        Some(path) => Schema::from_path(path)?,
        None => Schema::bundled()?,
    };
    log::debug!("Using schema {:?}", args.schema);

    let spinner = reading_spinner(args.input);
    let upload = Upload::read(args.input)?;

    let mut session = Session::new(schema);
    let ticket = session.select_file(&upload.filename)?;
    let event = session.receive(&ticket, &upload);
    spinner.finish_and_clear();

    let outcome = match (event?, args.sheet) {
        (SessionEvent::Rendered(outcome), Some(sheet)) if outcome.page != sheet => {
            rendered(session.select_page(sheet)?)?
        }
        (SessionEvent::Rendered(outcome), _) => outcome,
        (SessionEvent::SelectionRequired(_), Some(sheet)) => rendered(session.select_page(sheet)?)?,
        (SessionEvent::SelectionRequired(names), None) => {
            if !io::stdin().is_terminal() {
                return Err(Error::SheetSelectionRequired(names).into());
            }
            loop {
                let choice = prompt_sheet(&names)?;
                match session.select_page(&choice) {
                    Ok(SessionEvent::Ignored) => continue,
                    Ok(event) => break rendered(event)?,
                    Err(Error::SheetNotFound(name)) => {
                        eprintln!("{} {}", "No sheet named".yellow(), name);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        (event, _) => return Err(format!("unexpected session event: {:?}", event).into()),
    };

    match args.format {
        OutputFormat::Table => print_table(&outcome),
        OutputFormat::Json => println!("{}", render::to_json(&outcome, JsonFormat::Pretty)?),
    }

    if let Some(path) = args.export {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(render::export_filename(&upload.filename)));
        export(&outcome, &path)?;
    }

    Ok(if outcome.valid { 0 } else { EXIT_INVALID })
}

fn rendered(event: SessionEvent) -> Result<ValidationOutcome, Box<dyn std::error::Error>> {
    match event {
        SessionEvent::Rendered(outcome) => Ok(outcome),
        other => Err(format!("unexpected session event: {:?}", other).into()),
    }
}

fn reading_spinner(input: &Path) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Reading {}...", input.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ask for a sheet by number or name. Blank input returns an empty name.
fn prompt_sheet(names: &[String]) -> io::Result<String> {
    let mut stderr = io::stderr();
    writeln!(stderr, "{}", "Select sheet to validate".cyan().bold())?;
    for (i, name) in names.iter().enumerate() {
        writeln!(stderr, "  {} {}", format!("{}.", i + 1).dimmed(), name)?;
    }
    write!(stderr, "> ")?;
    stderr.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no sheet selected",
        ));
    }
    Ok(resolve_choice(line.trim(), names))
}

fn resolve_choice(choice: &str, names: &[String]) -> String {
    match choice.parse::<usize>() {
        Ok(n) if (1..=names.len()).contains(&n) => names[n - 1].clone(),
        _ => choice.to_string(),
    }
}

fn print_table(outcome: &ValidationOutcome) {
    println!(
        "{}: {} ({} rows)",
        "Sheet".bold(),
        outcome.page,
        outcome.row_count
    );
    if outcome.valid {
        println!("{}", render::VALID_MESSAGE.green().bold());
    } else {
        println!(
            "{} ({} errors)",
            render::INVALID_MESSAGE.red().bold(),
            outcome.error_count()
        );
        println!();
        print!("{}", render::diagnostics_table(&outcome.diagnostics));
    }
}

fn export(outcome: &ValidationOutcome, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if outcome.valid {
        println!("{}", "No errors to export".dimmed());
        return Ok(());
    }
    let csv = render::to_csv(&outcome.diagnostics, &ExportOptions::default())?;
    fs::write(path, csv)?;
    println!("{} {}", "Saved to".green(), path.display());
    Ok(())
}

fn cmd_sheets(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = sheetcheck::read_document(input)?;

    println!("{}", "Sheets".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (i, page) in doc.pages.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{:>3}.", i + 1).dimmed(),
            page.name,
            format!("({} rows)", page.row_count().saturating_sub(1)).dimmed()
        );
    }

    Ok(())
}

fn cmd_schema(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let schema = Schema::bundled()?;
    let json = serde_json::to_string_pretty(schema.as_value())?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sheetcheck".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Spreadsheet upload validation tool");
    println!();
    println!("License: MIT");
}
