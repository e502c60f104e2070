use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};
use super::ext::normalize_ext;

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Descend into subfolders; otherwise only direct children are listed
    pub recursive: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self { recursive: true }
    }
}

/// List the files under `folder` for which `filter` holds.
///
/// Paths are absolute and come back in filesystem order. The iterator is
/// lazy; call again to restart. A missing folder is an error rather than an
/// empty listing, so callers can tell "no matches" from "bad input".
///
/// ```rust,no_run
/// use fileconvert::pathkit::{files_under, has_extension, WalkOptions};
///
/// let wavs: Vec<_> = files_under("recordings", &WalkOptions::default(), Some(has_extension(".wav")))
///     .unwrap()
///     .collect();
/// ```
pub fn files_under<P, F>(
    folder: P,
    options: &WalkOptions,
    filter: Option<F>,
) -> Result<impl Iterator<Item = PathBuf> + use<P, F>>
where
    P: AsRef<Path>,
    F: Fn(&Path) -> bool,
{
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(ConvertError::FolderNotFound(folder.to_path_buf()));
    }

    let root = std::fs::canonicalize(folder)?;
    // Fail now on an unreadable root instead of yielding nothing
    std::fs::read_dir(&root)?;
    debug!("Listing files under {} (recursive: {})", root.display(), options.recursive);

    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let files = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        // Links are not followed while walking, but a link to a file still counts
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .map(|entry| entry.into_path())
        .filter(move |path| filter.as_ref().is_none_or(|f| f(path.as_path())));

    Ok(files)
}

/// Predicate matching paths whose extension equals `ext`, ignoring case.
pub fn has_extension(ext: &str) -> impl Fn(&Path) -> bool + use<> {
    let wanted = normalize_ext(ext).to_lowercase();
    move |path: &Path| {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn names(paths: impl Iterator<Item = PathBuf>) -> HashSet<String> {
        paths
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_filter_by_extension() {
        let dir = tempdir().unwrap();
        for name in ["a.wav", "b.WAV", "c.flac"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let found = files_under(dir.path(), &WalkOptions::default(), Some(has_extension(".wav"))).unwrap();
        let expected: HashSet<String> = ["a.wav", "b.WAV"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names(found), expected);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_listed() {
        let elsewhere = tempdir().unwrap();
        let target = elsewhere.path().join("take2.wav");
        fs::write(&target, b"x").unwrap();

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.wav"), b"x").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("b.wav")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), dir.path().join("linked_dir")).unwrap();

        let found = files_under(dir.path(), &WalkOptions::default(), Some(has_extension(".wav"))).unwrap();
        let expected: HashSet<String> = ["a.wav", "b.wav"].iter().map(|s| s.to_string()).collect();
        assert_eq!(names(found), expected);
    }

    #[test]
    fn test_recursive_and_flat() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        fs::write(dir.path().join("top.txt"), b"x").unwrap();
        fs::write(dir.path().join("nested/mid.txt"), b"x").unwrap();
        fs::write(dir.path().join("nested/deeper/low.txt"), b"x").unwrap();

        let all: Vec<PathBuf> =
            files_under(dir.path(), &WalkOptions::default(), None::<fn(&Path) -> bool>)
                .unwrap()
                .collect();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|p| p.is_absolute()));

        let flat = files_under(
            dir.path(),
            &WalkOptions { recursive: false },
            None::<fn(&Path) -> bool>,
        )
        .unwrap();
        assert_eq!(names(flat), HashSet::from(["top.txt".to_string()]));
    }

    #[test]
    fn test_custom_predicate() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("report_old_version.csv"), b"x").unwrap();
        fs::write(dir.path().join("report.csv"), b"x").unwrap();

        let found = files_under(
            dir.path(),
            &WalkOptions::default(),
            Some(|p: &Path| p.to_string_lossy().contains("old_version")),
        )
        .unwrap();
        assert_eq!(names(found), HashSet::from(["report_old_version.csv".to_string()]));
    }

    #[test]
    fn test_restartable() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.png"), b"x").unwrap();

        let first = files_under(dir.path(), &WalkOptions::default(), None::<fn(&Path) -> bool>)
            .unwrap()
            .count();
        let second = files_under(dir.path(), &WalkOptions::default(), None::<fn(&Path) -> bool>)
            .unwrap()
            .count();
        assert_eq!(first, 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = files_under(&missing, &WalkOptions::default(), None::<fn(&Path) -> bool>);
        assert!(matches!(result, Err(ConvertError::FolderNotFound(_))));
    }

    #[test]
    fn test_file_is_not_a_folder() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        let result = files_under(&file, &WalkOptions::default(), None::<fn(&Path) -> bool>);
        assert!(matches!(result, Err(ConvertError::FolderNotFound(_))));
    }
}
