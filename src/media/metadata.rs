use serde_json::{Map, Value};
use std::fmt;

use crate::error::Result;
use super::MediaKind;

/// Tags echoed for each kind of media
pub fn metadata_tags(kind: MediaKind) -> &'static [&'static str] {
    match kind {
        MediaKind::Image => &["ImageSize", "Make", "Model", "DateTimeOriginal", "GPSPosition"],
        MediaKind::Audio => &["Duration", "AudioBitrate", "SampleRate", "AudioSampleRate", "NumChannels", "AudioChannels"],
        MediaKind::Video => &["ImageSize", "Duration", "VideoFrameRate", "AvgBitrate"],
    }
}

/// Tags read back from exiftool, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub tags: Vec<(String, String)>,
}

impl Metadata {
    /// Parse `exiftool -json` output, keeping only `tags` that are present.
    pub fn from_exiftool_json(json: &str, tags: &[&str]) -> Result<Self> {
        let mut records: Vec<Map<String, Value>> = serde_json::from_str(json)?;
        if records.is_empty() {
            return Ok(Self::default());
        }
        let record = records.swap_remove(0);

        let tags = tags
            .iter()
            .filter_map(|tag| {
                let value = match record.get(*tag)? {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some((tag.to_string(), value))
            })
            .collect();

        Ok(Self { tags })
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (tag, value)) in self.tags.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}: {}", tag, value)?;
        }
        Ok(())
    }
}
