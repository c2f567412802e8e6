use super::nullable::null_as_default;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque id of a backend download job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub video_format_id: Option<String>,
    pub audio_format_id: Option<String>,
    pub audio_only: bool,
    pub playlist_items: Vec<String>,
    pub use_thumbnail_as_cover: bool,
    pub title_override: Option<String>,
    pub thumbnail_url_override: Option<String>,
}

/// Reply of `/download`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DownloadAck {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Started,
    Progress,
    Success,
    Failure,
    Revoked,
    #[serde(other)]
    #[default]
    Unknown,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Failure | JobState::Revoked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletedFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// One reply of `/progress/{task_id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: JobState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
    #[serde(default)]
    pub newly_completed_file: Option<CompletedFile>,
    #[serde(default)]
    pub all_completed_files: Option<Vec<CompletedFile>>,
}

impl ProgressSnapshot {
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal() || self.progress >= 100.0
    }

    pub fn completed_files(&self) -> &[CompletedFile] {
        self.all_completed_files.as_deref().unwrap_or(&[])
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref().filter(|s| !s.is_empty())
    }
}
