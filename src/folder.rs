use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::paths::FilePath;

/// Returns the absolute path of each file within `folder` and all of its
/// descendant folders.
///
/// The walk is top-down: a directory's files come before its subdirectories,
/// and siblings are ordered by file name. Links are not followed, but a link
/// that points at something other than a directory is reported like a file.
///
/// A folder that does not exist, or is not a directory, yields no paths.
pub fn file_paths_within_folder(folder: &Path) -> Result<Vec<FilePath>> {
    if !folder.is_dir() {
        debug!("Folder {:?} does not exist or is not a directory", folder);
        return Ok(Vec::new());
    }

    let root = std::path::absolute(folder).map_err(|source| Error::FolderPath {
        path: folder.to_path_buf(),
        source,
    })?;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

    let mut file_paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if is_file_like(&entry) {
            file_paths.push(FilePath::from_path(entry.path()));
        }
    }

    debug!("Found {} files under {:?}", file_paths.len(), root);
    Ok(file_paths)
}

fn is_file_like(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        return false;
    }
    if file_type.is_symlink() {
        // Broken links count as files.
        return !fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn make_parent() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("CAPITAL.TXT")).unwrap();
        File::create(dir.path().join("lowercase.txt")).unwrap();
        fs::create_dir(dir.path().join("child")).unwrap();
        File::create(dir.path().join("child").join("CAPITAL.TXT")).unwrap();
        dir
    }

    fn expected(dir: &Path, rel: &[&str]) -> Vec<FilePath> {
        let root = std::path::absolute(dir).unwrap();
        rel.iter().map(|r| FilePath::from_path(&root.join(r))).collect()
    }

    #[test]
    fn test_nonexistent_folder() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does_not_exist");
        assert!(file_paths_within_folder(&missing).unwrap().is_empty());

        let with_slash = format!("{}/", missing.display());
        assert!(file_paths_within_folder(Path::new(&with_slash)).unwrap().is_empty());
    }

    #[test]
    fn test_file_instead_of_folder() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();
        assert!(file_paths_within_folder(&file).unwrap().is_empty());
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_paths_within_folder(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_parent_folder() {
        let dir = make_parent();
        let want = expected(dir.path(), &["CAPITAL.TXT", "lowercase.txt", "child/CAPITAL.TXT"]);

        assert_eq!(file_paths_within_folder(dir.path()).unwrap(), want);

        let with_slash = format!("{}/", dir.path().display());
        assert_eq!(file_paths_within_folder(Path::new(&with_slash)).unwrap(), want);
    }

    #[test]
    fn test_child_folder() {
        let dir = make_parent();
        let want = expected(dir.path(), &["child/CAPITAL.TXT"]);
        assert_eq!(file_paths_within_folder(&dir.path().join("child")).unwrap(), want);
    }

    #[test]
    fn test_paths_are_absolute() {
        let dir = make_parent();
        for path in file_paths_within_folder(dir.path()).unwrap() {
            assert!(Path::new(path.as_str()).is_absolute(), "{path} is not absolute");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_links_to_folders_are_not_files() {
        let dir = make_parent();
        std::os::unix::fs::symlink(dir.path().join("child"), dir.path().join("link_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("lowercase.txt"), dir.path().join("link_file")).unwrap();

        let want = expected(
            dir.path(),
            &["CAPITAL.TXT", "link_file", "lowercase.txt", "child/CAPITAL.TXT"],
        );
        assert_eq!(file_paths_within_folder(dir.path()).unwrap(), want);
    }
}
