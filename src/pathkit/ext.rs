use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Strip a leading dot so `".mp3"` and `"mp3"` are equivalent.
pub fn normalize_ext(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}

/// Return `path` with its final extension replaced by `new_ext`.
///
/// A path without an extension gets `new_ext` appended. Only the last
/// segment is touched, so `clip.tar.gz` becomes `clip.tar.mp3`.
pub fn replace_ext<P: AsRef<Path>>(path: P, new_ext: &str) -> PathBuf {
    path.as_ref().with_extension(normalize_ext(new_ext))
}

/// Lowercased extension of `path`, used to pick the output format.
pub fn output_format<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| ConvertError::MissingExtension(path.to_path_buf()))
}
