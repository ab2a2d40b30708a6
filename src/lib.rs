//! Finds the files in a folder that a dupeGuru CSV export does not list.
//!
//! The folder is walked recursively, the export's `Folder` and `Filename`
//! columns are joined back into paths, and the files on disk that the
//! export never mentions are reported in sorted order, either one per line
//! or as a CSV file with the folder, file name and suffix split out.
//!
//! Exports from dupeGuru's "Folders" scan mode are not supported.

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

pub mod config;
pub mod csv_paths;
pub mod diagnostics;
pub mod error;
pub mod folder;
pub mod paths;
pub mod report;

pub use csv_paths::{file_paths_from_csv_file, file_paths_from_reader};
pub use diagnostics::{Diagnostics, LogLevel};
pub use error::{Error, Result};
pub use folder::file_paths_within_folder;
pub use paths::FilePath;
pub use report::{SortOrder, difference, write_console, write_csv, write_csv_file};

/// Where the differences go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Console,
    File(PathBuf),
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(OutputTarget::Console, OutputTarget::File)
    }
}

#[derive(Debug, Clone)]
pub struct Request {
    pub folder: PathBuf,
    pub csv_file: PathBuf,
    pub output: OutputTarget,
    pub sort: SortOrder,
}

/// Counts gathered during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub folder_files: usize,
    pub csv_files: usize,
    pub distinct_folder_files: usize,
    pub distinct_csv_files: usize,
    pub differences: usize,
}

/// Compares the folder against the CSV export and emits the differences.
///
/// Console output goes to `console`; it is left untouched when the target
/// is a file. Diagnostics go to `diagnostics` only.
pub fn run<W: Write>(request: &Request, diagnostics: &Diagnostics, console: &mut W) -> Result<Summary> {
    diagnostics.scope(|| reconcile(request, console))
}

fn reconcile<W: Write>(request: &Request, console: &mut W) -> Result<Summary> {
    info!("Folder       : {}", request.folder.display());
    info!("dupeGuru CSV : {}", request.csv_file.display());
    match &request.output {
        OutputTarget::Console => info!("Output file  : (console)"),
        OutputTarget::File(path) => info!("Output file  : {}", path.display()),
    }

    let folder_paths = file_paths_within_folder(&request.folder)?;
    let csv_paths = file_paths_from_csv_file(&request.csv_file)?;
    debug!("Number of file paths from folder   : {}", folder_paths.len());
    debug!("Number of file paths from CSV file : {}", csv_paths.len());

    let mut summary = Summary {
        folder_files: folder_paths.len(),
        csv_files: csv_paths.len(),
        distinct_folder_files: count_distinct(&folder_paths),
        distinct_csv_files: count_distinct(&csv_paths),
        differences: 0,
    };
    debug!("Number of distinct file paths from folder   : {}", summary.distinct_folder_files);
    debug!("Number of distinct file paths from CSV file : {}", summary.distinct_csv_files);

    let differences = difference(&folder_paths, &csv_paths, request.sort);
    summary.differences = differences.len();
    info!("Number of differences : {}", summary.differences);

    match &request.output {
        OutputTarget::Console => write_console(&differences, console).map_err(Error::Console)?,
        OutputTarget::File(path) => write_csv_file(&differences, path)?,
    }
    Ok(summary)
}

fn count_distinct(paths: &[FilePath]) -> usize {
    paths.iter().collect::<std::collections::HashSet<_>>().len()
}
