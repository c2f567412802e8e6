use super::nullable::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchInfoRequest {
    pub url: String,
}

/// Metadata returned by `/fetch_info`. Explicit `null`s decode like missing keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub original_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_formats: Vec<FormatOption>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub audio_formats: Vec<FormatOption>,
    #[serde(default)]
    pub default_video_format_id: Option<String>,
    #[serde(default)]
    pub default_audio_format_id: Option<String>,
    #[serde(default)]
    pub playlist_entries: Option<Vec<PlaylistEntry>>,
}

impl VideoInfo {
    pub fn playlist(&self) -> &[PlaylistEntry] {
        self.playlist_entries.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormatOption {
    #[serde(default, deserialize_with = "null_as_default")]
    pub format_id: String,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ext: String,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

impl FormatOption {
    /// Text shown in a format selector, e.g. `22 - 720p - mp4 (~12.34 MB)`.
    pub fn label(&self) -> String {
        let description = non_empty(&self.format_note)
            .or_else(|| non_empty(&self.resolution))
            .map(String::from)
            .or_else(|| match self.abr {
                Some(abr) if abr != 0.0 => Some(format!("{}k", abr)),
                _ => None,
            })
            .unwrap_or_else(|| String::from("N/A"));
        let mut label = format!("{} - {} - {}", self.format_id, description, self.ext);

        if let Some(size) = self.filesize_approx.filter(|s| *s != 0.0) {
            label.push_str(&format!(" (~{:.2} MB)", size / 1024.0 / 1024.0));
        }

        label
    }
}

/// Picks the server default when it is one of the options, else the first option.
pub fn initial_format(formats: &[FormatOption], default_id: Option<&str>) -> Option<String> {
    default_id
        .filter(|id| formats.iter().any(|f| f.format_id == *id))
        .map(String::from)
        .or_else(|| formats.first().map(|f| f.format_id.clone()))
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PlaylistEntry {
    /// Value submitted in `playlist_items`; the id wins over the url.
    pub fn selection_key(&self) -> Option<&str> {
        non_empty(&self.id).or_else(|| non_empty(&self.url))
    }

    pub fn label(&self, index: usize) -> String {
        match non_empty(&self.title) {
            Some(title) => title.to_string(),
            None => format!("Item {}", index + 1),
        }
    }
}

fn non_empty(val: &Option<String>) -> Option<&str> {
    val.as_deref().filter(|s| !s.is_empty())
}
