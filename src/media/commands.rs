use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{ConvertError, Result};
use super::Tool;

/// One external tool invocation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub tool: Tool,
    pub binary_path: PathBuf,
    pub args: Vec<OsString>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new command for `tool` located at `binary_path`
    pub fn new<P: Into<PathBuf>, S: Into<String>>(tool: Tool, binary_path: P, description: S) -> Self {
        Self {
            tool,
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Set video codec
    pub fn video_codec<S: AsRef<OsStr>>(self, codec: S) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Disable video
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set audio bitrate, passed through verbatim
    pub fn audio_bitrate<S: AsRef<OsStr>>(self, bitrate: S) -> Self {
        self.arg("-b:a").arg(bitrate)
    }

    /// Set video bitrate, passed through verbatim
    pub fn video_bitrate<S: AsRef<OsStr>>(self, bitrate: S) -> Self {
        self.arg("-b:v").arg(bitrate)
    }

    /// Set frame size as `WIDTHxHEIGHT`
    pub fn frame_size<S: AsRef<OsStr>>(self, resolution: S) -> Self {
        self.arg("-s").arg(resolution)
    }

    /// Stop after `count` video frames
    pub fn frames(self, count: u32) -> Self {
        self.arg("-frames:v").arg(count.to_string())
    }

    /// Arguments rendered as text, for logging and assertions
    pub fn args_lossy(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    /// Run the command to completion and return its standard output.
    ///
    /// A binary that cannot be spawned because it does not exist maps to
    /// `ToolMissing`; a non-zero exit maps to `ToolFailed`.
    pub fn execute(&self) -> Result<String> {
        debug!("Executing {}: {} {:?}", self.description, self.binary_path.display(), self.args_lossy());

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ConvertError::ToolMissing { tool: self.tool },
                _ => ConvertError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::ToolFailed {
                tool: self.tool,
                description: self.description.clone(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// ffmpeg's JPEG scale runs from 2 (best) to 31 (worst)
fn jpeg_qscale(quality: u8) -> u32 {
    let quality = u32::from(quality.min(100));
    2 + ((100 - quality) * 29 + 50) / 100
}

/// Builder for ffmpeg conversion commands
pub struct MediaCommandBuilder {
    binary_path: PathBuf,
    log_level: String,
    extra_args: Vec<String>,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<P: Into<PathBuf>, S: Into<String>>(binary_path: P, log_level: S, extra_args: &[String]) -> Self {
        Self {
            binary_path: binary_path.into(),
            log_level: log_level.into(),
            extra_args: extra_args.to_vec(),
        }
    }

    fn start<P: AsRef<Path>>(&self, description: String, input: P) -> MediaCommand {
        MediaCommand::new(Tool::Ffmpeg, &self.binary_path, description)
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg(&self.log_level)
            .overwrite()
            .input(input)
    }

    fn finish<P: AsRef<Path>>(&self, cmd: MediaCommand, output: P) -> MediaCommand {
        cmd.args(&self.extra_args).output(output)
    }

    /// Build image conversion command; `format` is the lowercased output extension
    pub fn image<P: AsRef<Path>>(&self, input: P, output: P, format: &str, quality: u8) -> MediaCommand {
        let mut cmd = self
            .start(format!("Image conversion to {}", format), input)
            .frames(1);

        cmd = match format {
            "jpg" | "jpeg" => cmd
                .video_codec("mjpeg")
                .arg("-q:v")
                .arg(jpeg_qscale(quality).to_string()),
            "webp" => cmd
                .video_codec("libwebp")
                .arg("-quality")
                .arg(quality.min(100).to_string()),
            // Lossless or tool-inferred formats take no quality flag
            _ => cmd,
        };

        self.finish(cmd, output)
    }

    /// Build audio conversion command
    pub fn audio<P: AsRef<Path>>(&self, input: P, output: P, format: &str, bitrate: &str) -> MediaCommand {
        let cmd = self
            .start(format!("Audio conversion to {}", format), input)
            .no_video()
            .audio_bitrate(bitrate);

        self.finish(cmd, output)
    }

    /// Build video conversion command
    pub fn video<P: AsRef<Path>>(
        &self,
        input: P,
        output: P,
        format: &str,
        resolution: &str,
        bitrate: &str,
    ) -> MediaCommand {
        let cmd = self
            .start(format!("Video conversion to {}", format), input)
            .frame_size(resolution)
            .video_bitrate(bitrate);

        self.finish(cmd, output)
    }

    /// Build version check command
    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(Tool::Ffmpeg, &self.binary_path, "Version check").arg("-version")
    }
}

/// Builder for exiftool commands
pub struct ExiftoolCommandBuilder {
    binary_path: PathBuf,
}

impl ExiftoolCommandBuilder {
    pub fn new<P: Into<PathBuf>>(binary_path: P) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Read `tags` from `path` as JSON
    pub fn read_tags<P: AsRef<Path>>(&self, path: P, tags: &[&str]) -> MediaCommand {
        MediaCommand::new(Tool::Exiftool, &self.binary_path, "Metadata read")
            .arg("-json")
            .args(tags.iter().map(|tag| format!("-{}", tag)))
            .arg(path.as_ref())
    }

    /// Copy every tag from `source` into `target` in place
    pub fn copy_tags<P: AsRef<Path>>(&self, source: P, target: P) -> MediaCommand {
        MediaCommand::new(Tool::Exiftool, &self.binary_path, "Metadata copy")
            .arg("-TagsFromFile")
            .arg(source.as_ref())
            .arg("-overwrite_original")
            .arg(target.as_ref())
    }

    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(Tool::Exiftool, &self.binary_path, "Version check").arg("-ver")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MediaCommandBuilder {
        MediaCommandBuilder::new("ffmpeg", "error", &[])
    }

    #[test]
    fn test_jpeg_qscale() {
        assert_eq!(jpeg_qscale(100), 2);
        assert_eq!(jpeg_qscale(85), 6);
        assert_eq!(jpeg_qscale(40), 19);
        assert_eq!(jpeg_qscale(0), 31);
        assert_eq!(jpeg_qscale(255), 2);
    }

    #[test]
    fn test_image_jpeg_args() {
        let cmd = builder().image(Path::new("photo.png"), Path::new("photo.jpg"), "jpg", 40);
        assert_eq!(cmd.tool, Tool::Ffmpeg);
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-hide_banner", "-loglevel", "error", "-y", "-i", "photo.png",
                "-frames:v", "1", "-c:v", "mjpeg", "-q:v", "19", "photo.jpg",
            ]
        );
    }

    #[test]
    fn test_image_webp_and_png_args() {
        let webp = builder().image(Path::new("a.png"), Path::new("a.webp"), "webp", 70);
        let args = webp.args_lossy();
        assert!(args.windows(2).any(|w| w == ["-c:v", "libwebp"]));
        assert!(args.windows(2).any(|w| w == ["-quality", "70"]));

        let png = builder().image(Path::new("a.jpg"), Path::new("a.png"), "png", 70);
        let args = png.args_lossy();
        assert!(!args.contains(&"-q:v".to_string()));
        assert!(!args.contains(&"-quality".to_string()));
        assert_eq!(args.last().unwrap(), "a.png");
    }

    #[test]
    fn test_audio_args() {
        let cmd = builder().audio(Path::new("a.wav"), Path::new("a.mp3"), "mp3", "32k");
        assert_eq!(
            cmd.args_lossy(),
            vec!["-hide_banner", "-loglevel", "error", "-y", "-i", "a.wav", "-vn", "-b:a", "32k", "a.mp3"]
        );
    }

    #[test]
    fn test_video_args_with_extra() {
        let builder = MediaCommandBuilder::new(
            "/usr/bin/ffmpeg",
            "warning",
            &["-map_metadata".to_string(), "0".to_string()],
        );
        let cmd = builder.video(Path::new("in.mov"), Path::new("out.mp4"), "mp4", "640x480", "256k");
        assert_eq!(cmd.binary_path, PathBuf::from("/usr/bin/ffmpeg"));
        assert_eq!(
            cmd.args_lossy(),
            vec![
                "-hide_banner", "-loglevel", "warning", "-y", "-i", "in.mov",
                "-s", "640x480", "-b:v", "256k", "-map_metadata", "0", "out.mp4",
            ]
        );
    }

    #[test]
    fn test_exiftool_args() {
        let exiftool = ExiftoolCommandBuilder::new("exiftool");
        let read = exiftool.read_tags(Path::new("photo.png"), &["ImageSize", "Make"]);
        assert_eq!(read.tool, Tool::Exiftool);
        assert_eq!(read.args_lossy(), vec!["-json", "-ImageSize", "-Make", "photo.png"]);

        let copy = exiftool.copy_tags(Path::new("photo.heic"), Path::new("photo.jpg"));
        assert_eq!(
            copy.args_lossy(),
            vec!["-TagsFromFile", "photo.heic", "-overwrite_original", "photo.jpg"]
        );
    }

    #[test]
    fn test_execute_missing_binary() {
        let cmd = MediaCommand::new(Tool::Ffmpeg, "/nonexistent/bin/ffmpeg-missing", "Version check")
            .arg("-version");
        let err = cmd.execute().unwrap_err();
        assert!(err.is_tool_missing());
    }
}
