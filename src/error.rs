use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a reconciliation run.
///
/// A missing folder and an empty CSV file are not errors; they simply
/// produce no paths.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not resolve folder path {}", path.display())]
    FolderPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not open CSV file {}", path.display())]
    OpenCsv {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV input")]
    Csv(#[from] csv::Error),

    #[error("CSV header has no \"{column}\" column")]
    HeaderColumnMissing { column: &'static str },

    #[error("CSV row on line {line} has {len} cells, but the \"{column}\" column is at index {index}")]
    MalformedRow {
        line: u64,
        column: &'static str,
        index: usize,
        len: usize,
    },

    #[error("could not create output file {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write output file {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not write results to the console")]
    Console(#[source] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
