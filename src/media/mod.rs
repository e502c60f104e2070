// Media conversion on top of external command-line tools
//
// - Commands: argument-list builders for ffmpeg and exiftool
// - Locator: finding the tool binaries (injectable for tests)
// - Metadata: exiftool output parsing
// - Processor: the ffmpeg-backed converter

pub mod commands;
pub mod locator;
pub mod metadata;
pub mod processor;

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use locator::*;
pub use metadata::*;
pub use processor::*;

use crate::config::ToolsConfig;
use crate::error::Result;

/// External binaries this crate shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Transcoder
    Ffmpeg,
    /// Metadata reader/writer
    Exiftool,
}

impl Tool {
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Exiftool => "exiftool",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff", "gif", "heic", "heif", "avif",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "opus", "m4a", "aac", "wma"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "webm", "wmv", "flv", "m4v"];

impl MediaKind {
    /// Guess the media kind from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// 0 (smallest file) to 100 (best quality)
    pub quality: u8,
    /// Copy EXIF/GPS tags from the source with exiftool
    pub keep_metadata: bool,
    /// Print sizes and source metadata after converting
    pub print_info: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            quality: 85,
            keep_metadata: false,
            print_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioOptions {
    /// ffmpeg bitrate string such as `32k`
    pub bitrate: String,
    pub print_info: bool,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            bitrate: "160k".to_string(),
            print_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOptions {
    /// `WIDTHxHEIGHT`, e.g. `640x480`
    pub resolution: String,
    pub bitrate: String,
    pub print_info: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            resolution: "1280x720".to_string(),
            bitrate: "1000k".to_string(),
            print_info: false,
        }
    }
}

/// Main trait for media conversion operations
pub trait MediaConverter {
    /// Convert an image, compressing it to the requested quality
    fn convert_image(&self, input: &Path, output: &Path, options: &ImageOptions) -> Result<ConversionReport>;

    /// Convert an audio file, re-encoding at the requested bitrate
    fn convert_audio(&self, input: &Path, output: &Path, options: &AudioOptions) -> Result<ConversionReport>;

    /// Convert a video file to the requested resolution and bitrate
    fn convert_video(&self, input: &Path, output: &Path, options: &VideoOptions) -> Result<ConversionReport>;

    /// Read the metadata tags relevant to `kind`
    fn read_metadata(&self, path: &Path, kind: MediaKind) -> Result<Metadata>;

    /// Resolve a tool and make sure it runs
    fn check_availability(&self, tool: Tool) -> Result<PathBuf>;
}

/// Factory for creating media converter instances
pub struct MediaConverterFactory;

impl MediaConverterFactory {
    /// Create the default converter implementation (ffmpeg + exiftool on PATH)
    pub fn create_converter(config: ToolsConfig) -> Box<dyn MediaConverter> {
        Box::new(FfmpegConverter::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_path() {
        assert_eq!(MediaKind::from_path("photo.PNG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_path("/music/a.wav"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_path("clip.mkv"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path("notes.txt"), None);
        assert_eq!(MediaKind::from_path("README"), None);
    }

    #[test]
    fn test_option_defaults() {
        assert_eq!(ImageOptions::default().quality, 85);
        assert_eq!(AudioOptions::default().bitrate, "160k");
        let video = VideoOptions::default();
        assert_eq!(video.resolution, "1280x720");
        assert_eq!(video.bitrate, "1000k");
    }
}
