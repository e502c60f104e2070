use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::media::{AudioOptions, ImageOptions, VideoOptions};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fileconvert.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub image: ImageDefaults,
    pub audio: AudioDefaults,
    pub video: VideoDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Path to ffmpeg binary; searched in PATH when unset
    pub ffmpeg: Option<PathBuf>,
    /// Path to exiftool binary; searched in PATH when unset
    pub exiftool: Option<PathBuf>,
    /// Value passed to ffmpeg's `-loglevel`
    pub ffmpeg_log_level: String,
    /// Additional ffmpeg arguments inserted before the output path
    /// e.g. ["-map_metadata", "0"]
    pub extra_ffmpeg_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDefaults {
    /// 0 (smallest) to 100 (best)
    pub quality: u8,
    pub keep_metadata: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioDefaults {
    /// high: 256k, mid: 160k, low: 96k
    pub bitrate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoDefaults {
    /// high: 1920x1080, mid: 1280x720, low: 640x480
    pub resolution: String,
    /// high: 3000k, mid: 1000k, low: 500k
    pub bitrate: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: None,
            exiftool: None,
            ffmpeg_log_level: "error".to_string(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            quality: 85,
            keep_metadata: false,
        }
    }
}

impl Default for AudioDefaults {
    fn default() -> Self {
        Self {
            bitrate: "160k".to_string(),
        }
    }
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            resolution: "1280x720".to_string(),
            bitrate: "1000k".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("Failed to read config file: {}", e)))?;

        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConvertError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConvertError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    pub fn image_options(&self) -> ImageOptions {
        ImageOptions {
            quality: self.image.quality.min(100),
            keep_metadata: self.image.keep_metadata,
            print_info: false,
        }
    }

    pub fn audio_options(&self) -> AudioOptions {
        AudioOptions {
            bitrate: self.audio.bitrate.clone(),
            print_info: false,
        }
    }

    pub fn video_options(&self) -> VideoOptions {
        VideoOptions {
            resolution: self.video.resolution.clone(),
            bitrate: self.video.bitrate.clone(),
            print_info: false,
        }
    }
}
