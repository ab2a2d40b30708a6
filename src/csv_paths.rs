use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::paths::{self, FilePath};

pub const FOLDER_COLUMN: &str = "Folder";
pub const FILENAME_COLUMN: &str = "Filename";

const UTF8_BOM: char = '\u{feff}';

/// Returns the file paths listed in a CSV file exported from dupeGuru.
///
/// See [`file_paths_from_reader`].
pub fn file_paths_from_csv_file(path: &Path) -> Result<Vec<FilePath>> {
    let file = File::open(path).map_err(|source| Error::OpenCsv {
        path: path.to_path_buf(),
        source,
    })?;
    file_paths_from_reader(file)
}

/// Rebuilds one path per data row from the `Folder` and `Filename` columns.
///
/// The first row is the header; both columns are located there by name.
/// Rows where every cell is empty are skipped. Input with no rows at all
/// yields no paths.
pub fn file_paths_from_reader<R: Read>(reader: R) -> Result<Vec<FilePath>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = reader.records();

    let Some(header) = records.next().transpose()? else {
        debug!("CSV input is empty");
        return Ok(Vec::new());
    };

    let folder_idx = column_index(&header, FOLDER_COLUMN)?;
    let filename_idx = column_index(&header, FILENAME_COLUMN)?;
    debug!("Index of CSV column containing folder   : {}", folder_idx);
    debug!("Index of CSV column containing filename : {}", filename_idx);

    let mut file_paths = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let folder = cell(&record, folder_idx, FOLDER_COLUMN)?;
        let filename = cell(&record, filename_idx, FILENAME_COLUMN)?;
        file_paths.push(FilePath::new(&paths::join(folder, filename)));
    }

    debug!("Read {} file paths from CSV", file_paths.len());
    Ok(file_paths)
}

fn column_index(header: &StringRecord, column: &'static str) -> Result<usize> {
    header
        .iter()
        .enumerate()
        .position(|(idx, name)| {
            let name = if idx == 0 { name.trim_start_matches(UTF8_BOM) } else { name };
            name == column
        })
        .ok_or(Error::HeaderColumnMissing { column })
}

fn cell<'r>(record: &'r StringRecord, index: usize, column: &'static str) -> Result<&'r str> {
    record.get(index).ok_or_else(|| Error::MalformedRow {
        line: record.position().map_or(0, |p| p.line()),
        column,
        index,
        len: record.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::MAIN_SEPARATOR_STR;

    const HEADINGS: &str = "Group ID,Filename,Folder,Size (KB),Dimensions,Match %\n";

    fn native(s: &str) -> String {
        s.replace('/', MAIN_SEPARATOR_STR)
    }

    fn read(content: &str) -> Result<Vec<String>> {
        Ok(file_paths_from_reader(content.as_bytes())?
            .into_iter()
            .map(FilePath::into_string)
            .collect())
    }

    #[test]
    fn test_headings_only() {
        assert!(read(HEADINGS).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(read("").unwrap().is_empty());
    }

    #[test]
    fn test_normal_export() {
        let content = format!(
            "{HEADINGS}\
             0,banana.bbb,C:\\carrot\\daikon,1,,100\n\
             ,,,,,\n\
             1,giraffe,h:\\hyena,2,,100\n\
             1,csh,\\bash,3,,100\n"
        );
        let want = vec![
            native("C:/carrot/daikon/banana.bbb"),
            native("h:/hyena/giraffe"),
            native("/bash/csh"),
        ];
        assert_eq!(read(&content).unwrap(), want);
    }

    #[test]
    fn test_quoted_cells() {
        let content = "\"Folder\",\"Filename\"\n\"/a, b\",\"c \"\"d\"\".txt\"\n";
        assert_eq!(read(content).unwrap(), vec![native("/a, b/c \"d\".txt")]);
    }

    #[test]
    fn test_relative_folder_is_not_made_absolute() {
        let content = "Folder,Filename\nsome/dir,file.txt\n";
        assert_eq!(read(content).unwrap(), vec![native("some/dir/file.txt")]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_colon_in_file_name_keeps_folder() {
        let content = "Folder,Filename\n/x,a:b.txt\n";
        assert_eq!(read(content).unwrap(), vec!["/x/a:b.txt".to_string()]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let content = "\u{feff}Folder,Filename\n/x,y\n";
        assert_eq!(read(content).unwrap(), vec![native("/x/y")]);
    }

    #[test]
    fn test_missing_header_column() {
        let err = read("Group ID,Filename,Size\n0,a,1\n").unwrap_err();
        assert!(matches!(err, Error::HeaderColumnMissing { column: "Folder" }));

        let err = read("Folder,filename\n/a,b\n").unwrap_err();
        assert!(matches!(err, Error::HeaderColumnMissing { column: "Filename" }));
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = read("Filename,Size,Folder\na,1,/x\nb,2\n").unwrap_err();
        match err {
            Error::MalformedRow { line, column, index, len } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Folder");
                assert_eq!(index, 2);
                assert_eq!(len, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Folder,Filename\r\n/one,two.txt\r\n").unwrap();
        let paths = file_paths_from_csv_file(file.path()).unwrap();
        assert_eq!(paths, vec![FilePath::new("/one/two.txt")]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = file_paths_from_csv_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, Error::OpenCsv { .. }));
    }
}
