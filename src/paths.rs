use std::borrow::{Borrow, Cow};
use std::fmt;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path};

use tracing::warn;

/// A file location compared by its normalized string form.
///
/// Both `/` and `\` are accepted as separators on input, whatever the
/// platform, because dupeGuru exports may come from another OS than the one
/// running the comparison. The platform separator is emitted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilePath(String);

impl FilePath {
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    /// Non-UTF-8 components are replaced lossily, with a warning, since
    /// such a path may no longer match the file on disk.
    pub fn from_path(path: &Path) -> Self {
        let lossy = path.to_string_lossy();
        if let Cow::Owned(_) = lossy {
            warn!("Path is not valid UTF-8, comparing it as {:?}", lossy);
        }
        Self::new(&lossy)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FilePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Splits a leading drive letter (`C:`) off the path.
fn split_drive(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        path.split_at(2)
    } else {
        ("", path)
    }
}

/// Lexically normalizes a path: separators become the platform separator,
/// repeated separators and `.` components are dropped, `..` removes the
/// preceding component. A rooted path never climbs above its root.
pub fn normalize(raw: &str) -> String {
    let (drive, rest) = split_drive(raw);
    let rooted = rest.starts_with(is_sep);

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split(is_sep) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let mut out = String::with_capacity(raw.len());
    out.push_str(drive);
    if rooted {
        out.push(MAIN_SEPARATOR);
    }
    out.push_str(&parts.join(MAIN_SEPARATOR_STR));
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Joins a folder and a file name the way a path join does: an absolute
/// file name replaces the folder, an empty folder contributes nothing.
///
/// Outside Windows a drive prefix only makes a name absolute when a
/// separator follows it, so `a:b.txt` stays a plain file name.
pub fn join(folder: &str, filename: &str) -> String {
    let (drive, rest) = split_drive(filename);
    let absolute = rest.starts_with(is_sep) || (cfg!(windows) && !drive.is_empty());
    if folder.is_empty() || absolute {
        return filename.to_string();
    }
    if folder.ends_with(is_sep) {
        format!("{folder}{filename}")
    } else {
        format!("{folder}{MAIN_SEPARATOR}{filename}")
    }
}

/// Splits a path at its last separator into `(folder, file name)`.
///
/// Trailing separators are stripped from the folder unless the folder is a
/// root (`/`, `C:\`). A path without separators has an empty folder, or
/// just its drive.
pub fn split(path: &str) -> (&str, &str) {
    let (drive, rest) = split_drive(path);
    match rest.rfind(is_sep) {
        Some(idx) => {
            let head = &rest[..=idx];
            let trimmed = head.trim_end_matches(is_sep);
            let head = if trimmed.is_empty() { head } else { trimmed };
            (&path[..drive.len() + head.len()], &rest[idx + 1..])
        }
        None => (drive, rest),
    }
}

/// The final extension of a file name including its dot, or `""`.
///
/// `archive.tar.gz` gives `.gz`; `.bashrc` and `name.` give nothing.
pub fn suffix(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) if idx > 0 && idx < filename.len() - 1 => &filename[idx..],
        _ => "",
    }
}
