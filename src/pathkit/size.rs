use std::fmt;
use std::path::Path;

use crate::error::Result;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// File size in bytes together with its readable form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSize {
    pub bytes: u64,
    pub readable: String,
}

impl FileSize {
    pub fn new(bytes: u64) -> Self {
        Self {
            bytes,
            readable: format_size(bytes),
        }
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable)
    }
}

/// Read the size of the file at `path`.
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<FileSize> {
    let metadata = std::fs::metadata(path)?;
    Ok(FileSize::new(metadata.len()))
}

/// Format a byte count with 1024-based units, e.g. `12.56 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(12_861), "12.56 KB");
        assert_eq!(format_size(298_716_659), "284.88 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_file_size() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();
        file.flush().unwrap();

        let size = file_size(file.path()).unwrap();
        assert_eq!(size.bytes, 2048);
        assert_eq!(size.to_string(), "2.00 KB");
    }

    #[test]
    fn test_file_size_missing_file() {
        assert!(file_size("/definitely/not/here.bin").is_err());
    }
}
