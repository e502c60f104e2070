use std::path::{Path, PathBuf};
use tracing::debug;
use which::which;

use crate::config::ToolsConfig;
use crate::error::{ConvertError, Result};
use super::Tool;

/// Resolves the binary to run for a tool.
///
/// Injected into the converter so tests can substitute fake tools.
#[cfg_attr(test, mockall::automock)]
pub trait ToolLocator: Send + Sync {
    fn locate(&self, tool: Tool) -> Result<PathBuf>;
}

/// Configured paths first, then `PATH`
#[derive(Debug, Clone, Default)]
pub struct SystemLocator {
    ffmpeg: Option<PathBuf>,
    exiftool: Option<PathBuf>,
}

impl SystemLocator {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            exiftool: config.exiftool.clone(),
        }
    }

    fn configured(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Ffmpeg => self.ffmpeg.as_deref(),
            Tool::Exiftool => self.exiftool.as_deref(),
        }
    }
}

impl ToolLocator for SystemLocator {
    fn locate(&self, tool: Tool) -> Result<PathBuf> {
        let resolved = match self.configured(tool) {
            Some(path) if path.is_file() => Ok(path.to_path_buf()),
            // A bare command name in the config is still looked up in PATH
            Some(path) => which(path),
            None => which(tool.binary_name()),
        };

        match resolved {
            Ok(path) => {
                debug!("Using {} at {}", tool, path.display());
                Ok(path)
            }
            Err(e) => {
                debug!("{} not found: {}", tool, e);
                Err(ConvertError::ToolMissing { tool })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_configured_path_wins() {
        let dir = tempdir().unwrap();
        let fake = dir.path().join("my-ffmpeg");
        std::fs::write(&fake, b"#!/bin/sh\n").unwrap();

        let config = ToolsConfig {
            ffmpeg: Some(fake.clone()),
            ..ToolsConfig::default()
        };
        let locator = SystemLocator::new(&config);
        assert_eq!(locator.locate(Tool::Ffmpeg).unwrap(), fake);
    }

    #[test]
    fn test_configured_path_missing() {
        let dir = tempdir().unwrap();
        let config = ToolsConfig {
            exiftool: Some(dir.path().join("no-exiftool-here")),
            ..ToolsConfig::default()
        };
        let locator = SystemLocator::new(&config);
        let err = locator.locate(Tool::Exiftool).unwrap_err();
        assert!(matches!(err, ConvertError::ToolMissing { tool: Tool::Exiftool }));
    }
}
