use std::path::PathBuf;
use thiserror::Error;

use crate::media::Tool;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No such input file: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Folder not found or not a directory: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Output file must have an extension to determine the format: {}", .0.display())]
    MissingExtension(PathBuf),

    #[error("{tool} is not installed or not found in PATH")]
    ToolMissing { tool: Tool },

    #[error("{description} failed ({tool} exited with {}): {stderr}", exit_label(.code))]
    ToolFailed {
        tool: Tool,
        description: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("No path selected")]
    NoPathSelected,
}

impl ConvertError {
    /// Whether the error means an external tool is absent, as opposed to a
    /// failure specific to one file.
    pub fn is_tool_missing(&self) -> bool {
        matches!(self, Self::ToolMissing { .. })
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failed_message() {
        let err = ConvertError::ToolFailed {
            tool: Tool::Ffmpeg,
            description: "Audio conversion".to_string(),
            code: Some(1),
            stderr: "Invalid data found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Audio conversion failed (ffmpeg exited with 1): Invalid data found"
        );
        assert!(!err.is_tool_missing());
    }

    #[test]
    fn test_tool_missing_is_distinct() {
        let err = ConvertError::ToolMissing { tool: Tool::Exiftool };
        assert!(err.is_tool_missing());
        assert_eq!(err.to_string(), "exiftool is not installed or not found in PATH");
    }
}
