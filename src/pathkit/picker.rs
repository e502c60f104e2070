use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConvertError, Result};
use super::ext::normalize_ext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    /// Choose an existing file to read
    Open,
    /// Choose a destination to write
    Save,
}

/// What to ask the user for when picking a file
#[derive(Debug, Clone)]
pub struct FileRequest {
    pub title: String,
    /// Extension filter such as `.wav`; `None` allows every file type
    pub extension: Option<String>,
    pub initial_dir: Option<PathBuf>,
    pub mode: PickMode,
}

impl FileRequest {
    pub fn open<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            extension: None,
            initial_dir: None,
            mode: PickMode::Open,
        }
    }

    pub fn save<S: Into<String>>(title: S) -> Self {
        Self {
            mode: PickMode::Save,
            ..Self::open(title)
        }
    }

    pub fn extension<S: AsRef<str>>(mut self, ext: S) -> Self {
        self.extension = Some(format!(".{}", normalize_ext(ext.as_ref())));
        self
    }

    pub fn initial_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.initial_dir = Some(dir.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FolderRequest {
    pub title: String,
    pub initial_dir: Option<PathBuf>,
}

impl FolderRequest {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            initial_dir: None,
        }
    }

    pub fn initial_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.initial_dir = Some(dir.into());
        self
    }
}

/// Capability for interactive path selection.
///
/// `None` / an empty list means the user cancelled.
pub trait PathPicker {
    fn pick_file(&mut self, request: &FileRequest) -> Result<Option<PathBuf>>;

    fn pick_files(&mut self, request: &FileRequest) -> Result<Vec<PathBuf>>;

    fn pick_folder(&mut self, request: &FolderRequest) -> Result<Option<PathBuf>>;
}

/// Ask `picker` for a file path to read, or to write in save mode.
pub fn get_filepath(picker: &mut dyn PathPicker, request: &FileRequest) -> Result<PathBuf> {
    picker.pick_file(request)?.ok_or(ConvertError::NoPathSelected)
}

/// Ask `picker` for one or more existing files.
pub fn get_filepaths(picker: &mut dyn PathPicker, request: &FileRequest) -> Result<Vec<PathBuf>> {
    let paths = picker.pick_files(request)?;
    if paths.is_empty() {
        return Err(ConvertError::NoPathSelected);
    }
    Ok(paths)
}

/// Ask `picker` for a folder.
pub fn get_folderpath(picker: &mut dyn PathPicker, request: &FolderRequest) -> Result<PathBuf> {
    picker.pick_folder(request)?.ok_or(ConvertError::NoPathSelected)
}

/// Terminal picker reading answers line by line.
///
/// An empty line or end of input cancels.
pub struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl PromptPicker<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr and read from stdin
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer.to_string()))
        }
    }

    fn file_prompt(request: &FileRequest) -> String {
        match &request.extension {
            Some(ext) => format!("{} [*{}]", request.title, ext),
            None => request.title.clone(),
        }
    }
}

fn resolve(answer: &str, initial_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(answer);
    match initial_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

/// Whether `path` passes the request's extension filter, ignoring case
fn matches_filter(path: &Path, extension: Option<&str>) -> bool {
    let Some(wanted) = extension else {
        return true;
    };
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(normalize_ext(wanted)))
}

impl<R: BufRead, W: Write> PathPicker for PromptPicker<R, W> {
    fn pick_file(&mut self, request: &FileRequest) -> Result<Option<PathBuf>> {
        let prompt = Self::file_prompt(request);

        loop {
            let Some(answer) = self.read_answer(&prompt)? else {
                return Ok(None);
            };
            let mut path = resolve(&answer, request.initial_dir.as_deref());

            match request.mode {
                PickMode::Open => {
                    if !path.is_file() {
                        writeln!(self.output, "No such file: {}", path.display())?;
                    } else if !matches_filter(&path, request.extension.as_deref()) {
                        let wanted = request.extension.as_deref().unwrap_or_default();
                        writeln!(self.output, "Not a *{} file: {}", wanted, path.display())?;
                    } else {
                        debug!("Selected file: {}", path.display());
                        return Ok(Some(path));
                    }
                }
                PickMode::Save => {
                    if path.extension().is_none() {
                        if let Some(ext) = &request.extension {
                            path.set_extension(normalize_ext(ext));
                        }
                    }
                    debug!("Selected save path: {}", path.display());
                    return Ok(Some(path));
                }
            }
        }
    }

    fn pick_files(&mut self, request: &FileRequest) -> Result<Vec<PathBuf>> {
        let prompt = format!("{} (blank line to finish)", Self::file_prompt(request));
        let mut paths = Vec::new();

        while let Some(answer) = self.read_answer(&prompt)? {
            let path = resolve(&answer, request.initial_dir.as_deref());
            if !path.is_file() {
                writeln!(self.output, "No such file: {}", path.display())?;
            } else if !matches_filter(&path, request.extension.as_deref()) {
                let wanted = request.extension.as_deref().unwrap_or_default();
                writeln!(self.output, "Not a *{} file: {}", wanted, path.display())?;
            } else {
                paths.push(path);
            }
        }

        Ok(paths)
    }

    fn pick_folder(&mut self, request: &FolderRequest) -> Result<Option<PathBuf>> {
        loop {
            let Some(answer) = self.read_answer(&request.title)? else {
                return Ok(None);
            };
            let path = resolve(&answer, request.initial_dir.as_deref());
            if path.is_dir() {
                debug!("Selected folder: {}", path.display());
                return Ok(Some(path));
            }
            writeln!(self.output, "No such folder: {}", path.display())?;
        }
    }
}

/// Native OS dialogs
#[cfg(feature = "dialog")]
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogPicker;

#[cfg(feature = "dialog")]
impl DialogPicker {
    fn file_dialog(request: &FileRequest) -> rfd::FileDialog {
        let mut dialog = rfd::FileDialog::new().set_title(&request.title);
        dialog = match &request.extension {
            Some(ext) => {
                let bare = normalize_ext(ext);
                dialog.add_filter(format!("{} Files", bare.to_uppercase()), &[bare])
            }
            None => dialog.add_filter("All Files", &["*"]),
        };
        if let Some(dir) = &request.initial_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }
}

#[cfg(feature = "dialog")]
impl PathPicker for DialogPicker {
    fn pick_file(&mut self, request: &FileRequest) -> Result<Option<PathBuf>> {
        let dialog = Self::file_dialog(request);
        Ok(match request.mode {
            PickMode::Open => dialog.pick_file(),
            PickMode::Save => dialog.save_file(),
        })
    }

    fn pick_files(&mut self, request: &FileRequest) -> Result<Vec<PathBuf>> {
        Ok(Self::file_dialog(request).pick_files().unwrap_or_default())
    }

    fn pick_folder(&mut self, request: &FolderRequest) -> Result<Option<PathBuf>> {
        let mut dialog = rfd::FileDialog::new().set_title(&request.title);
        if let Some(dir) = &request.initial_dir {
            dialog = dialog.set_directory(dir);
        }
        Ok(dialog.pick_folder())
    }
}
