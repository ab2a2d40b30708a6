use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use csv::{Terminator, WriterBuilder};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::paths::{self, FilePath};

pub const CSV_HEADER: [&str; 4] = ["File", "Folder", "Filename", "Suffix (only)"];

/// Order of the reported paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    /// Byte-wise on the normalized path.
    #[default]
    Lexical,
    /// Digit runs compare by value (`img2` before `img10`).
    Natural,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(SortOrder::Lexical),
            "natural" => Ok(SortOrder::Natural),
            _ => Err(format!("Invalid sort '{}'. Use one of: lexical, natural", s)),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = String;

    fn try_from(s: String) -> Result<Self, String> {
        s.parse()
    }
}

/// Paths found in the folder that the CSV does not mention, each once,
/// sorted.
pub fn difference(folder_paths: &[FilePath], csv_paths: &[FilePath], order: SortOrder) -> Vec<FilePath> {
    let known: HashSet<&FilePath> = csv_paths.iter().collect();
    let missing: BTreeSet<&FilePath> = folder_paths.iter().filter(|p| !known.contains(*p)).collect();

    let mut sorted: Vec<FilePath> = missing.into_iter().cloned().collect();
    if order == SortOrder::Natural {
        // Ties fall back to byte order so the result stays total.
        sorted.sort_by(|a, b| natord::compare(a.as_str(), b.as_str()).then_with(|| a.cmp(b)));
    }
    sorted
}

/// One line of the CSV report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow<'a> {
    pub file: &'a str,
    pub folder: &'a str,
    pub filename: &'a str,
    pub suffix: &'a str,
}

impl<'a> ReportRow<'a> {
    pub fn from_path(path: &'a str) -> Self {
        let (folder, filename) = paths::split(path);
        Self {
            file: path,
            folder,
            filename,
            suffix: paths::suffix(filename),
        }
    }

    fn cells(&self) -> [&'a str; 4] {
        [self.file, self.folder, self.filename, self.suffix]
    }
}

/// Writes one path per line. Nothing at all is written for an empty list.
pub fn write_console<P: AsRef<str>, W: Write>(paths: &[P], out: &mut W) -> io::Result<()> {
    for path in paths {
        writeln!(out, "{}", path.as_ref())?;
    }
    out.flush()
}

/// Writes the header row followed by one [`ReportRow`] per path.
pub fn write_csv<P: AsRef<str>, W: Write>(paths: &[P], out: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(out);

    writer.write_record(CSV_HEADER)?;
    for path in paths {
        writer.write_record(ReportRow::from_path(path.as_ref()).cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the CSV report into it. Missing
/// parent folders are not created.
pub fn write_csv_file<P: AsRef<str>>(paths: &[P], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(paths, file).map_err(|source| Error::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}
