use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConvertError, Result};
use crate::media::{AudioOptions, ConversionReport, ImageOptions, MediaConverter, MediaKind, VideoOptions};
use crate::pathkit::{files_under, has_extension, replace_ext, WalkOptions};

/// Per-kind options for a folder conversion
#[derive(Debug, Clone)]
pub enum BatchOptions {
    Image(ImageOptions),
    Audio(AudioOptions),
    Video(VideoOptions),
}

impl BatchOptions {
    pub fn kind(&self) -> MediaKind {
        match self {
            BatchOptions::Image(_) => MediaKind::Image,
            BatchOptions::Audio(_) => MediaKind::Audio,
            BatchOptions::Video(_) => MediaKind::Video,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub folder: PathBuf,
    /// Extension of the files to pick up, e.g. `.wav`
    pub from_ext: String,
    /// Extension of the converted files, e.g. `.mp3`
    pub to_ext: String,
    /// Mirror converted files under this folder instead of next to the input
    pub output_dir: Option<PathBuf>,
    pub recursive: bool,
    /// Abort on the first failed file instead of skipping it
    pub stop_on_error: bool,
    pub show_progress: bool,
    pub options: BatchOptions,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub converted: Vec<ConversionReport>,
    /// Inputs that failed, with the error message
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// Where the converted copy of `input` goes.
fn output_path_for(input: &Path, request: &BatchRequest, root: &Path) -> Result<PathBuf> {
    let target = replace_ext(input, &request.to_ext);
    let Some(output_dir) = &request.output_dir else {
        return Ok(target);
    };

    let relative = pathdiff::diff_paths(&target, root).ok_or_else(|| {
        ConvertError::Config(format!("Cannot place {} under {}", target.display(), output_dir.display()))
    })?;
    let output = output_dir.join(relative);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(output)
}

fn convert_one(converter: &dyn MediaConverter, options: &BatchOptions, input: &Path, output: &Path) -> Result<ConversionReport> {
    match options {
        BatchOptions::Image(options) => converter.convert_image(input, output, options),
        BatchOptions::Audio(options) => converter.convert_audio(input, output, options),
        BatchOptions::Video(options) => converter.convert_video(input, output, options),
    }
}

fn progress_bar(len: u64, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Convert every matching file under a folder, one after another.
///
/// A missing tool aborts the whole batch; any other per-file failure is
/// recorded and skipped unless `stop_on_error` is set.
pub fn convert_folder(converter: &dyn MediaConverter, request: &BatchRequest) -> Result<BatchSummary> {
    let walk = WalkOptions {
        recursive: request.recursive,
    };
    let inputs: Vec<PathBuf> = files_under(&request.folder, &walk, Some(has_extension(&request.from_ext)))?.collect();
    let root = std::fs::canonicalize(&request.folder)?;

    info!(
        "Found {} {} files to convert in {}",
        inputs.len(),
        request.options.kind(),
        request.folder.display()
    );

    let bar = progress_bar(inputs.len() as u64, request.show_progress);
    let mut summary = BatchSummary::default();

    for input in inputs {
        bar.set_message(input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default());

        let result = output_path_for(&input, request, &root)
            .and_then(|output| convert_one(converter, &request.options, &input, &output));

        match result {
            Ok(report) => {
                debug!("Successfully converted: {}", input.display());
                summary.converted.push(report);
            }
            Err(e) if e.is_tool_missing() || request.stop_on_error => {
                bar.abandon();
                return Err(e);
            }
            Err(e) => {
                bar.suspend(|| warn!("Failed to convert {}: {}", input.display(), e));
                summary.failed.push((input, e.to_string()));
            }
        }
        bar.inc(1);
    }

    bar.finish_and_clear();
    info!(
        "Batch finished: {} converted, {} failed",
        summary.converted.len(),
        summary.failed.len()
    );
    Ok(summary)
}
