//! CLI tool to decode a DAMEF extract into a CSV table.
//!
//! Usage:
//!   damef-run <extract.txt>                       CSV of every record on stdout
//!   damef-run <extract.txt> -t 01,03 -o out.csv   selected types to a file
//!   damef-run <extract.txt> --interactive         preview, select, export prompts
//!
//! Skipped lines are reported on stderr.

use clap::Parser;
use damef_rs::{DEFAULT_EXPORT_FILE, RecordTable, TypeFilter, export_csv, logging, process_file, write_csv};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

/// Decode a DAMEF extract and export the selected record types as CSV.
#[derive(Parser)]
#[command(name = "damef-run")]
struct Cli {
    /// DAMEF extract (UTF-8 text, one record per line)
    input: PathBuf,

    /// Record types to keep, comma separated (default: all)
    #[arg(short, long)]
    types: Option<String>,

    /// Write CSV to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// CSV delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Fail if any line could not be decoded
    #[arg(long)]
    strict: bool,

    /// Show the table and prompt for the selection and the export
    #[arg(short, long)]
    interactive: bool,

    /// Rows shown in table previews
    #[arg(long, default_value_t = 20)]
    max_rows: usize,

    /// Debug logging and record counts on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if !cli.delimiter.is_ascii() {
        eprintln!("Delimiter must be a single ASCII character, got '{}'", cli.delimiter);
        process::exit(1);
    }

    let outcome = match process_file(&cli.input) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error processing '{}': {e}", cli.input.display());
            process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("Input:    {}", cli.input.display());
        eprintln!(
            "Records:  {} decoded, {} skipped",
            outcome.table.len(),
            outcome.diagnostics.len()
        );
    }

    let table = if cli.strict {
        match outcome.into_strict() {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Strict mode: {e}");
                process::exit(1);
            }
        }
    } else {
        outcome.table
    };

    let result = if cli.interactive {
        run_interactive(&cli, &table)
    } else {
        run_batch(&cli, &table)
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_batch(cli: &Cli, table: &RecordTable) -> Result<(), Box<dyn std::error::Error>> {
    let filter = TypeFilter::parse(cli.types.as_deref().unwrap_or(""))?;
    let selected = filter.apply(table);
    let delimiter = cli.delimiter as u8;

    match &cli.output {
        Some(path) => export_csv(&selected, path, delimiter)?,
        None => write_csv(&selected, io::stdout().lock(), delimiter)?,
    }

    if cli.verbose {
        eprintln!("Exported: {} rows", selected.len());
    }
    Ok(())
}

fn run_interactive(cli: &Cli, table: &RecordTable) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", table.preview(cli.max_rows));

    let filter = match &cli.types {
        Some(types) => TypeFilter::parse(types)?,
        None => loop {
            let answer = prompt(
                "Digite os tipos de registro para filtrar (separados por vírgula, ou pressione Enter para mostrar todos): ",
            )?;
            match TypeFilter::parse(&answer) {
                Ok(filter) => break filter,
                Err(e) => eprintln!("{e}"),
            }
        },
    };

    let selected = filter.apply(table);
    println!("{}", selected.preview(cli.max_rows));

    let answer = prompt("Deseja exportar os dados filtrados para CSV? (s/n): ")?;
    if answer.trim().eq_ignore_ascii_case("s") {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
        export_csv(&selected, &path, cli.delimiter as u8)?;
        println!("Arquivo CSV exportado com sucesso: {}", path.display());
    }
    Ok(())
}

/// Print `message` and read one line from stdin. End of input reads as empty.
fn prompt(message: &str) -> io::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}
