//! fileconvert - convert image, audio and video files with ffmpeg
//!
//! Command-line front end over the `fileconvert` library. Paths left off the
//! command line are asked for interactively.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fileconvert::batch::{convert_folder, BatchOptions, BatchRequest};
use fileconvert::cli::{Args, Commands};
use fileconvert::config::{Config, DEFAULT_CONFIG_FILE};
use fileconvert::media::{MediaConverterFactory, MediaKind, Tool};
use fileconvert::pathkit::{
    file_size, get_filepath, get_folderpath, replace_ext, FileRequest, FolderRequest, PathPicker,
};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    let _guard = setup_logging(args.verbose)?;
    info!("Starting fileconvert");

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    let converter = MediaConverterFactory::create_converter(config.tools.clone());
    let mut picker = create_picker();

    match args.command {
        Commands::Image { input, output, quality, keep_metadata, info } => {
            let input = input_or_pick(input, picker.as_mut(), "Select an image")?;
            let output = output_or_pick(output, picker.as_mut(), "Save converted image as")?;

            let mut options = config.image_options();
            if let Some(quality) = quality {
                options.quality = quality;
            }
            options.keep_metadata |= keep_metadata;
            options.print_info = info;

            converter.convert_image(&input, &output, &options)?;
        }
        Commands::Audio { input, output, bitrate, info } => {
            let input = input_or_pick(input, picker.as_mut(), "Select an audio file")?;
            let output = output_or_pick(output, picker.as_mut(), "Save converted audio as")?;

            let mut options = config.audio_options();
            if let Some(bitrate) = bitrate {
                options.bitrate = bitrate;
            }
            options.print_info = info;

            converter.convert_audio(&input, &output, &options)?;
        }
        Commands::Video { input, output, resolution, bitrate, info } => {
            let input = input_or_pick(input, picker.as_mut(), "Select a video file")?;
            let output = output_or_pick(output, picker.as_mut(), "Save converted video as")?;

            let mut options = config.video_options();
            if let Some(resolution) = resolution {
                options.resolution = resolution;
            }
            if let Some(bitrate) = bitrate {
                options.bitrate = bitrate;
            }
            options.print_info = info;

            converter.convert_video(&input, &output, &options)?;
        }
        Commands::Batch {
            dir,
            kind,
            from,
            to,
            output_dir,
            no_recursive,
            stop_on_error,
            quality,
            bitrate,
            resolution,
            info,
        } => {
            let folder = match dir {
                Some(dir) => dir,
                None => get_folderpath(picker.as_mut(), &FolderRequest::new("Select a folder"))?,
            };

            let options = match kind {
                MediaKind::Image => {
                    let mut options = config.image_options();
                    options.quality = quality.unwrap_or(options.quality);
                    options.print_info = info;
                    BatchOptions::Image(options)
                }
                MediaKind::Audio => {
                    let mut options = config.audio_options();
                    options.bitrate = bitrate.unwrap_or(options.bitrate);
                    options.print_info = info;
                    BatchOptions::Audio(options)
                }
                MediaKind::Video => {
                    let mut options = config.video_options();
                    options.resolution = resolution.unwrap_or(options.resolution);
                    options.bitrate = bitrate.unwrap_or(options.bitrate);
                    options.print_info = info;
                    BatchOptions::Video(options)
                }
            };

            let request = BatchRequest {
                folder,
                from_ext: from,
                to_ext: to,
                output_dir,
                recursive: !no_recursive,
                stop_on_error,
                show_progress: !info,
                options,
            };

            let summary = convert_folder(converter.as_ref(), &request)?;
            println!("Converted {} of {} files", summary.converted.len(), summary.total());
            for (path, error) in &summary.failed {
                println!("  failed: {}: {}", path.display(), error);
            }
        }
        Commands::Info { input } => {
            let input = input_or_pick(input, picker.as_mut(), "Select a media file")?;
            let size = file_size(&input)?;
            println!("{}: {} ({} bytes)", input.display(), size, size.bytes);

            match MediaKind::from_path(&input) {
                Some(kind) => {
                    let metadata = converter.read_metadata(&input, kind)?;
                    if metadata.is_empty() {
                        println!("  (no {} metadata found)", kind);
                    } else {
                        println!("{}", metadata);
                    }
                }
                None => warn!("Unknown media type for {}, skipping metadata", input.display()),
            }
        }
        Commands::Ext { path, ext } => {
            println!("{}", replace_ext(&path, &ext).display());
        }
        Commands::Check => {
            let mut missing = 0;
            for tool in [Tool::Ffmpeg, Tool::Exiftool] {
                match converter.check_availability(tool) {
                    Ok(path) => println!("{:<10} {}", tool.to_string(), path.display()),
                    Err(e) => {
                        missing += 1;
                        println!("{:<10} {}", tool.to_string(), e);
                    }
                }
            }
            if missing > 0 {
                anyhow::bail!("{} tool(s) unavailable", missing);
            }
        }
        Commands::InitConfig { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            config.save_to_file(&path)?;
            println!("Wrote {}", path.display());
        }
    }

    info!("fileconvert completed successfully");
    Ok(())
}

/// Native dialogs when built with the `dialog` feature, terminal prompts otherwise
fn create_picker() -> Box<dyn PathPicker> {
    #[cfg(feature = "dialog")]
    {
        Box::new(fileconvert::pathkit::DialogPicker)
    }
    #[cfg(not(feature = "dialog"))]
    {
        Box::new(fileconvert::pathkit::PromptPicker::stdio())
    }
}

fn input_or_pick(path: Option<PathBuf>, picker: &mut dyn PathPicker, title: &str) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Ok(get_filepath(picker, &FileRequest::open(title))?),
    }
}

fn output_or_pick(path: Option<PathBuf>, picker: &mut dyn PathPicker, title: &str) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Ok(get_filepath(picker, &FileRequest::save(title))?),
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    // Create log directory
    let log_dir = std::env::current_dir()?.join(".fileconvert").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "fileconvert.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console output stays on stderr so printed reports remain clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("fileconvert.log").display());

    Ok(guard)
}
