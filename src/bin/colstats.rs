use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colstats::{compute_report, CsvSource, Report, SourceConfig, DEFAULT_COLUMN};

/// Descriptive statistics for one numeric column of a CSV file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the CSV file to process, or `-` for stdin
    #[arg()]
    file_path: PathBuf,

    /// Header name of the column to summarize
    #[arg(short, long, default_value = DEFAULT_COLUMN)]
    column: String,

    /// Field delimiter (a single ASCII character)
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Keep whitespace around header names and fields
    #[arg(long)]
    no_trim: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn source_config(&self) -> Result<SourceConfig> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter {:?} is not a single ASCII character", self.delimiter);
        }
        Ok(SourceConfig::new()
            .with_delimiter(self.delimiter as u8)
            .with_trim(!self.no_trim))
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.source_config()?;
    let label = cli.file_path.display().to_string();

    let result = if cli.file_path.as_os_str() == "-" {
        let source = CsvSource::from_reader(io::stdin().lock(), &cli.column, &config)
            .context("Failed to read CSV from stdin")?;
        log_start(&source);
        compute_report(source, &cli.column)
    } else {
        let source = CsvSource::from_path(&cli.file_path, &cli.column, &config)
            .with_context(|| format!("Failed to open the CSV file '{label}'"))?;
        log_start(&source);
        compute_report(source, &cli.column)
    };
    let report = result.with_context(|| format!("Failed to process the CSV file '{label}'"))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&cli.column, &report);
    }

    Ok(())
}

fn log_start<R: io::Read>(source: &CsvSource<R>) {
    match source.path() {
        Some(path) => log::info!(
            "calculating statistics of {:?} in {}",
            source.column(),
            path.display()
        ),
        None => log::info!("calculating statistics of {:?} from stdin", source.column()),
    }
}

fn print_report(column: &str, report: &Report) {
    let stats = &report.statistics;
    let title = format!("--- Statistics for '{column}' ---");

    println!("{title}");
    println!("Count:    {}", stats.count);
    println!("Min:      {:.2}", stats.min);
    println!("Max:      {:.2}", stats.max);
    println!("Sum:      {:.2}", stats.sum);
    println!("Mean:     {:.2}", stats.mean);
    println!("Variance: {:.4}", stats.variance);
    println!("Std dev:  {:.4}", stats.standard_deviation);
    println!("Skewness: {:.4}", stats.skewness);
    println!("Kurtosis: {:.4}", stats.kurtosis);
    println!("{}", "-".repeat(title.len()));
    println!(
        "Rows:     {} read, {} skipped",
        report.rows_read, report.rows_skipped
    );
}
