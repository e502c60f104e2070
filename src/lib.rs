//! fileconvert - image, audio and video format conversion
//!
//! Thin wrappers around ffmpeg (transcoding) and exiftool (metadata), plus
//! the path helpers needed to drive them: interactive path selection,
//! folder enumeration with filters and extension replacement.
//!
//! ```rust,no_run
//! use fileconvert::config::ToolsConfig;
//! use fileconvert::media::{AudioOptions, MediaConverterFactory};
//! use fileconvert::pathkit::{files_under, has_extension, replace_ext, WalkOptions};
//!
//! let converter = MediaConverterFactory::create_converter(ToolsConfig::default());
//! let options = AudioOptions { bitrate: "32k".to_string(), print_info: true };
//! for input in files_under("recordings", &WalkOptions::default(), Some(has_extension(".wav")))? {
//!     converter.convert_audio(&input, &replace_ext(&input, ".mp3"), &options)?;
//! }
//! # Ok::<(), fileconvert::error::ConvertError>(())
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod pathkit;

pub use error::{ConvertError, Result};
