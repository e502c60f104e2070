use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::media::MediaKind;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an image to another format and compress its quality
    Image {
        /// Input image (prompted for when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output image; its extension selects the format
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression quality, 0 to 100
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: Option<u8>,

        /// Copy EXIF/GPS metadata from the source with exiftool
        #[arg(long)]
        keep_metadata: bool,

        /// Print sizes and source metadata
        #[arg(long)]
        info: bool,
    },

    /// Convert an audio file and reduce its size by adjusting the bitrate
    Audio {
        /// Input audio file (prompted for when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output audio file; its extension selects the format
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output bitrate, e.g. 256k, 160k, 96k
        #[arg(short, long)]
        bitrate: Option<String>,

        /// Print sizes and source metadata
        #[arg(long)]
        info: bool,
    },

    /// Convert a video file and adjust its resolution and bitrate
    Video {
        /// Input video file (prompted for when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output video file; its extension selects the format
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output resolution, e.g. 1920x1080, 1280x720, 640x480
        #[arg(short, long)]
        resolution: Option<String>,

        /// Output video bitrate, e.g. 3000k, 1000k, 500k
        #[arg(short, long)]
        bitrate: Option<String>,

        /// Print sizes and source metadata
        #[arg(long)]
        info: bool,
    },

    /// Convert every file with a given extension inside a folder
    Batch {
        /// Folder to scan (prompted for when omitted)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Kind of media in the folder
        #[arg(short, long, value_enum)]
        kind: MediaKind,

        /// Extension of the files to convert, e.g. .wav
        #[arg(long)]
        from: String,

        /// Extension of the converted files, e.g. .mp3
        #[arg(long)]
        to: String,

        /// Write converted files under this folder, mirroring the layout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Only look at the top level of the folder
        #[arg(long)]
        no_recursive: bool,

        /// Abort on the first failed file
        #[arg(long)]
        stop_on_error: bool,

        /// Image quality override
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: Option<u8>,

        /// Audio or video bitrate override
        #[arg(short, long)]
        bitrate: Option<String>,

        /// Video resolution override
        #[arg(short, long)]
        resolution: Option<String>,

        /// Print sizes and source metadata for each file
        #[arg(long)]
        info: bool,
    },

    /// Show size and metadata of a media file
    Info {
        /// Media file (prompted for when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print a path with its extension replaced
    Ext {
        path: PathBuf,

        /// New extension, with or without the leading dot
        ext: String,
    },

    /// Check that ffmpeg and exiftool can be found
    Check,

    /// Write the default configuration to a file
    InitConfig {
        /// Destination (default: fileconvert.toml)
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_command() {
        let args = Args::parse_from([
            "fileconvert", "image", "-i", "photo.png", "-o", "photo.jpg", "--quality", "40", "--info",
        ]);
        match args.command {
            Commands::Image { input, output, quality, keep_metadata, info } => {
                assert_eq!(input, Some(PathBuf::from("photo.png")));
                assert_eq!(output, Some(PathBuf::from("photo.jpg")));
                assert_eq!(quality, Some(40));
                assert!(!keep_metadata);
                assert!(info);
            }
            _ => panic!("expected image command"),
        }
    }

    #[test]
    fn test_quality_out_of_range() {
        let result = Args::try_parse_from(["fileconvert", "image", "--quality", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_batch_command() {
        let args = Args::parse_from([
            "fileconvert", "-v", "batch", "-d", "music", "--kind", "audio", "--from", ".wav", "--to", ".mp3",
            "--bitrate", "32k",
        ]);
        assert!(args.verbose);
        match args.command {
            Commands::Batch { dir, kind, from, to, bitrate, no_recursive, .. } => {
                assert_eq!(dir, Some(PathBuf::from("music")));
                assert_eq!(kind, MediaKind::Audio);
                assert_eq!(from, ".wav");
                assert_eq!(to, ".mp3");
                assert_eq!(bitrate.as_deref(), Some("32k"));
                assert!(!no_recursive);
            }
            _ => panic!("expected batch command"),
        }
    }
}
