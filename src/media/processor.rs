use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::ToolsConfig;
use crate::error::{ConvertError, Result};
use crate::pathkit::{file_size, output_format, FileSize};
use super::{
    metadata_tags, AudioOptions, ExiftoolCommandBuilder, ImageOptions, MediaCommand,
    MediaCommandBuilder, MediaConverter, MediaKind, Metadata, SystemLocator, Tool, ToolLocator,
    VideoOptions,
};

/// Outcome of one conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_size: FileSize,
    pub output_size: FileSize,
    /// Source metadata, collected only when info printing was requested
    pub metadata: Option<Metadata>,
}

impl ConversionReport {
    fn new(input: &Path, output: &Path) -> Result<Self> {
        Ok(Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            input_size: file_size(input)?,
            output_size: file_size(output)?,
            metadata: None,
        })
    }

    /// Output size as a percentage of the input size
    pub fn size_ratio(&self) -> Option<f64> {
        if self.input_size.bytes == 0 {
            return None;
        }
        Some(self.output_size.bytes as f64 / self.input_size.bytes as f64 * 100.0)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "convert: \"{}\" ({}) -> \"{}\" ({})",
            file_name(&self.input),
            self.input_size,
            file_name(&self.output),
            self.output_size
        )?;
        match self.size_ratio() {
            Some(ratio) => write!(f, ", {:.2}% of original size.", ratio)?,
            None => write!(f, ".")?,
        }
        if let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) {
            write!(f, "\n{}", metadata)?;
        }
        Ok(())
    }
}

/// Converter backed by ffmpeg, with exiftool for metadata
pub struct FfmpegConverter {
    config: ToolsConfig,
    locator: Box<dyn ToolLocator>,
}

impl FfmpegConverter {
    /// Create a converter that finds its tools through the config and PATH
    pub fn new(config: ToolsConfig) -> Self {
        let locator = SystemLocator::new(&config);
        Self::with_locator(config, Box::new(locator))
    }

    /// Create a converter with a custom tool locator
    pub fn with_locator(config: ToolsConfig, locator: Box<dyn ToolLocator>) -> Self {
        Self { config, locator }
    }

    fn command_builder(&self) -> Result<MediaCommandBuilder> {
        let ffmpeg = self.locator.locate(Tool::Ffmpeg)?;
        Ok(MediaCommandBuilder::new(
            ffmpeg,
            &self.config.ffmpeg_log_level,
            &self.config.extra_ffmpeg_args,
        ))
    }

    fn exiftool(&self) -> Result<ExiftoolCommandBuilder> {
        let exiftool = self.locator.locate(Tool::Exiftool)?;
        Ok(ExiftoolCommandBuilder::new(exiftool))
    }

    /// Shared flow: validate paths, locate ffmpeg, run, report.
    fn run_conversion<F>(
        &self,
        kind: MediaKind,
        input: &Path,
        output: &Path,
        print_info: bool,
        build: F,
    ) -> Result<ConversionReport>
    where
        F: FnOnce(&MediaCommandBuilder, &str) -> MediaCommand,
    {
        if !input.is_file() {
            return Err(ConvertError::InputNotFound(input.to_path_buf()));
        }
        let format = output_format(output)?;
        let builder = self.command_builder()?;

        info!("Converting {} {} -> {}", kind, input.display(), output.display());
        let command = build(&builder, &format);
        command.execute()?;
        info!("{} completed", command.description);

        let mut report = ConversionReport::new(input, output)?;
        if print_info {
            self.print_report(&mut report, kind);
        }
        Ok(report)
    }

    fn print_report(&self, report: &mut ConversionReport, kind: MediaKind) {
        report.metadata = self.try_read_metadata(&report.input, kind);
        println!("{}", report);
    }

    /// Metadata for display only; a missing or failing exiftool is not fatal
    fn try_read_metadata(&self, path: &Path, kind: MediaKind) -> Option<Metadata> {
        match self.read_metadata(path, kind) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!("Metadata unavailable for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn copy_metadata(&self, source: &Path, target: &Path) {
        let result = self
            .exiftool()
            .and_then(|exiftool| exiftool.copy_tags(source, target).execute());

        match result {
            Ok(_) => debug!("Copied metadata from {} to {}", source.display(), target.display()),
            Err(e) if e.is_tool_missing() => {
                warn!("ExifTool is not installed or not in PATH. Metadata will not be copied.")
            }
            Err(e) => warn!("ExifTool failed to copy metadata: {}", e),
        }
    }
}

impl MediaConverter for FfmpegConverter {
    fn convert_image(&self, input: &Path, output: &Path, options: &ImageOptions) -> Result<ConversionReport> {
        let mut report = self.run_conversion(MediaKind::Image, input, output, false, |builder, format| {
            builder.image(input, output, format, options.quality)
        })?;

        if options.keep_metadata {
            self.copy_metadata(input, output);
            report.output_size = file_size(output)?;
        }
        if options.print_info {
            self.print_report(&mut report, MediaKind::Image);
        }
        Ok(report)
    }

    fn convert_audio(&self, input: &Path, output: &Path, options: &AudioOptions) -> Result<ConversionReport> {
        self.run_conversion(MediaKind::Audio, input, output, options.print_info, |builder, format| {
            builder.audio(input, output, format, &options.bitrate)
        })
    }

    fn convert_video(&self, input: &Path, output: &Path, options: &VideoOptions) -> Result<ConversionReport> {
        self.run_conversion(MediaKind::Video, input, output, options.print_info, |builder, format| {
            builder.video(input, output, format, &options.resolution, &options.bitrate)
        })
    }

    fn read_metadata(&self, path: &Path, kind: MediaKind) -> Result<Metadata> {
        if !path.is_file() {
            return Err(ConvertError::InputNotFound(path.to_path_buf()));
        }
        let tags = metadata_tags(kind);
        let json = self.exiftool()?.read_tags(path, tags).execute()?;
        Metadata::from_exiftool_json(&json, tags)
    }

    fn check_availability(&self, tool: Tool) -> Result<PathBuf> {
        let path = self.locator.locate(tool)?;
        let command = match tool {
            Tool::Ffmpeg => MediaCommandBuilder::new(&path, "error", &[]).version_check(),
            Tool::Exiftool => ExiftoolCommandBuilder::new(&path).version_check(),
        };
        let version = command.execute()?;
        info!("{} is available: {}", tool, version.lines().next().unwrap_or("unknown version"));
        Ok(path)
    }
}
