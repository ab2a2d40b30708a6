use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use dgpost::config::Config;
use dgpost::{Diagnostics, LogLevel, OutputTarget, Request, SortOrder};

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("APP_GIT_HASH"), ")");

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Compares a folder to a CSV file exported from dupeGuru. Displays the differences \
             on the console (default) or writes them to a CSV file."
)]
struct Cli {
    /// Path to the folder with which you want to compare the CSV file exported from dupeGuru
    folder: PathBuf,

    /// Path to the CSV file exported from dupeGuru
    csv_file: PathBuf,

    /// Generate a CSV file at PATH instead of displaying the results on the console
    #[arg(long, alias = "output_csv_file", value_name = "PATH")]
    output_csv_file: Option<PathBuf>,

    /// Logging level: NOTSET, DEBUG, INFO, WARNING, ERROR, CRITICAL
    #[arg(long, alias = "log_level", value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Sort order: lexical, natural
    #[arg(long, value_name = "ORDER")]
    sort: Option<SortOrder>,

    /// Config file to use instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn validate(&self) -> Result<(), String> {
        if !self.csv_file.exists() {
            return Err(format!("CSV file does not exist: {:?}", self.csv_file));
        }
        if !self.csv_file.is_file() {
            return Err(format!("CSV file is not a file: {:?}", self.csv_file));
        }
        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::load(path).context("failed to load the --config file"),
            None => Config::load_default().context("failed to load the default config file"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let config = args.load_config()?;
    let level = args.log_level.unwrap_or(config.logging.level);
    let diagnostics = Diagnostics::new(level);

    let request = Request {
        folder: args.folder,
        csv_file: args.csv_file,
        output: OutputTarget::from(args.output_csv_file),
        sort: args.sort.unwrap_or(config.report.sort),
    };

    let mut stdout = io::stdout().lock();
    dgpost::run(&request, &diagnostics, &mut stdout)
        .with_context(|| format!("failed to compare {:?} with {:?}", request.folder, request.csv_file))?;
    Ok(())
}
