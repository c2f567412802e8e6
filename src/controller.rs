//! State of the download page.
//!
//! [`ClientController`] holds everything the page shows and every piece of
//! in-memory state (last fetched info, active job, files already surfaced).
//! User actions and replies of the download service are methods on it; the
//! yew components only translate events into these calls and render the
//! result. Nothing in here touches the browser.

use crate::objects::{
    initial_format, ClientConfig, CompletedFile, DownloadAck, DownloadRequest, FetchError,
    FetchInfoRequest, JobHandle, JobState, PlaylistEntry, ProgressSnapshot, VideoInfo,
};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

const TITLE_PLACEHOLDER: &str = "Title";

/// Input problems detected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL.")]
    EmptyUrl,
    #[error("Enter a URL and fetch its info first.")]
    MissingUrl,
    #[error("Please select a video format.")]
    MissingVideoFormat,
    #[error("Please select an audio format.")]
    MissingAudioFormat,
    #[error("Please select at least one playlist item to download.")]
    EmptyPlaylistSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub text: String,
    pub level: LogLevel,
}

/// Enabled state of the action buttons. Reset is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub fetch: bool,
    pub download: bool,
    pub audio_only: bool,
}

impl Controls {
    fn initial() -> Self {
        Self {
            fetch: true,
            download: false,
            audio_only: false,
        }
    }

    fn all(enabled: bool) -> Self {
        Self {
            fetch: enabled,
            download: enabled,
            audio_only: enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistChoice {
    pub entry: PlaylistEntry,
    pub checked: bool,
}

/// Request the controller is waiting on. Replies carrying another id are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Nothing,
    Info(Uuid),
    Download(Uuid),
}

/// What the caller has to do after a poll tick.
#[derive(Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub stop_polling: bool,
    pub auto_downloads: Vec<CompletedFile>,
}

pub struct ClientController {
    auto_download_default: bool,
    url_input: String,
    video_info: Option<VideoInfo>,
    info_visible: bool,
    title_text: String,
    video_format: Option<String>,
    audio_format: Option<String>,
    playlist: Vec<PlaylistChoice>,
    use_thumbnail_as_cover: bool,
    auto_download: bool,
    controls: Controls,
    progress_visible: bool,
    progress: f64,
    status_text: String,
    log: Vec<LogLine>,
    downloaded_files: Vec<CompletedFile>,
    processed_files: HashSet<String>,
    active_job: Option<JobHandle>,
    pending: Pending,
}

impl ClientController {
    pub fn new(config: &ClientConfig) -> Self {
        let mut controller = Self {
            auto_download_default: config.auto_download,
            url_input: String::new(),
            video_info: None,
            info_visible: false,
            title_text: String::from(TITLE_PLACEHOLDER),
            video_format: None,
            audio_format: None,
            playlist: Vec::new(),
            use_thumbnail_as_cover: false,
            auto_download: config.auto_download,
            controls: Controls::initial(),
            progress_visible: false,
            progress: 0.0,
            status_text: String::new(),
            log: Vec::new(),
            downloaded_files: Vec::new(),
            processed_files: HashSet::new(),
            active_job: None,
            pending: Pending::Nothing,
        };

        controller.reset();

        if let Some(url) = &config.preload_url {
            controller.url_input = url.clone();
            controller.push_log(
                format!("URL {} loaded. Press \"Fetch info\" to continue.", url),
                LogLevel::Info,
            );
        }

        controller
    }

    /// Restores the initial state. Returns the job that was being polled, if any.
    pub fn reset(&mut self) -> Option<JobHandle> {
        self.url_input.clear();
        self.video_info = None;
        self.info_visible = false;
        self.title_text = String::from(TITLE_PLACEHOLDER);
        self.video_format = None;
        self.audio_format = None;
        self.playlist.clear();
        self.use_thumbnail_as_cover = false;
        self.auto_download = self.auto_download_default;
        self.controls = Controls::initial();
        self.progress_visible = false;
        self.progress = 0.0;
        self.status_text.clear();
        self.log.clear();
        self.downloaded_files.clear();
        self.processed_files.clear();
        self.pending = Pending::Nothing;
        self.active_job.take()
    }

    pub fn set_url_input(&mut self, url: String) {
        self.url_input = url;
    }

    pub fn select_video_format(&mut self, format_id: String) {
        self.video_format = Some(format_id).filter(|id| !id.is_empty());
    }

    pub fn select_audio_format(&mut self, format_id: String) {
        self.audio_format = Some(format_id).filter(|id| !id.is_empty());
    }

    pub fn set_playlist_item(&mut self, index: usize, checked: bool) {
        if let Some(choice) = self.playlist.get_mut(index) {
            choice.checked = checked;
        }
    }

    pub fn set_all_playlist_items(&mut self, checked: bool) {
        for choice in &mut self.playlist {
            choice.checked = checked;
        }
    }

    pub fn set_use_thumbnail_as_cover(&mut self, use_thumbnail: bool) {
        self.use_thumbnail_as_cover = use_thumbnail;
    }

    pub fn set_auto_download(&mut self, auto_download: bool) {
        self.auto_download = auto_download;
    }

    /// Validates the URL field and prepares the page for a metadata request.
    /// The returned id has to accompany the reply.
    pub fn begin_fetch(&mut self) -> Result<(Uuid, FetchInfoRequest), ValidationError> {
        let url = self.url_input.trim().to_string();

        if url.is_empty() {
            return Err(self.reject(ValidationError::EmptyUrl));
        }

        self.info_visible = false;
        self.title_text = String::from("Loading info...");
        self.playlist.clear();
        self.progress_visible = false;
        self.progress = 0.0;
        self.status_text = String::from("Fetching info...");
        self.log.clear();
        self.downloaded_files.clear();
        self.processed_files.clear();
        self.controls = Controls::all(false);

        let request_id = Uuid::new_v4();

        self.pending = Pending::Info(request_id);
        self.push_log(format!("Fetching info for {}", url), LogLevel::Info);

        Ok((request_id, FetchInfoRequest { url }))
    }

    pub fn fetch_succeeded(&mut self, request_id: Uuid, info: VideoInfo) {
        if self.pending != Pending::Info(request_id) {
            log::debug!("discarding info reply of abandoned request {}", request_id);
            return;
        }
        self.pending = Pending::Nothing;

        self.title_text = match info.title.is_empty() {
            true => String::from("No title"),
            false => info.title.clone(),
        };
        self.video_format = initial_format(
            &info.video_formats,
            info.default_video_format_id.as_deref(),
        );
        self.audio_format = initial_format(
            &info.audio_formats,
            info.default_audio_format_id.as_deref(),
        );
        self.playlist = info
            .playlist()
            .iter()
            .map(|entry| PlaylistChoice {
                entry: entry.clone(),
                checked: true,
            })
            .collect();
        self.video_info = Some(info);
        self.info_visible = true;
        self.status_text = String::from("Info fetched.");
        self.push_log("Info fetched.".into(), LogLevel::Success);
        self.controls = Controls::all(true);
    }

    pub fn fetch_failed(&mut self, request_id: Uuid, err: &FetchError) {
        if self.pending != Pending::Info(request_id) {
            log::debug!("discarding info error of abandoned request {}: {}", request_id, err);
            return;
        }
        self.pending = Pending::Nothing;

        let message = format!("Error fetching info: {}", err);

        log::error!("{}", message);
        self.push_log(message.clone(), LogLevel::Error);
        self.status_text = message;
        self.title_text = String::from("Error");
        self.controls.fetch = true;
    }

    /// Checks the selections and prepares the page for a new job. The returned id
    /// has to accompany the reply.
    pub fn begin_download(
        &mut self,
        audio_only: bool,
    ) -> Result<(Uuid, DownloadRequest), ValidationError> {
        let request = self.download_request(audio_only).map_err(|e| self.reject(e))?;

        self.active_job = None;
        self.controls = Controls::all(false);
        self.status_text = match audio_only {
            true => String::from("Requesting audio download..."),
            false => String::from("Requesting download..."),
        };
        self.progress = 0.0;
        self.progress_visible = true;
        self.log.clear();
        self.downloaded_files.clear();
        self.processed_files.clear();

        let request_id = Uuid::new_v4();

        self.pending = Pending::Download(request_id);
        self.push_log(
            match audio_only {
                true => String::from("Requesting audio download."),
                false => String::from("Requesting video/audio download."),
            },
            LogLevel::Info,
        );

        Ok((request_id, request))
    }

    fn download_request(&self, audio_only: bool) -> Result<DownloadRequest, ValidationError> {
        let url = self
            .video_info
            .as_ref()
            .map(|info| info.original_url.trim())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| self.url_input.trim())
            .to_string();

        if url.is_empty() {
            return Err(ValidationError::MissingUrl);
        }

        let info = self.video_info.as_ref();

        if !audio_only
            && self.video_format.is_none()
            && info.map_or(false, |i| !i.video_formats.is_empty())
        {
            return Err(ValidationError::MissingVideoFormat);
        }
        if self.audio_format.is_none() && info.map_or(false, |i| !i.audio_formats.is_empty()) {
            return Err(ValidationError::MissingAudioFormat);
        }

        let playlist_items: Vec<String> = self
            .playlist
            .iter()
            .filter(|choice| choice.checked)
            .filter_map(|choice| choice.entry.selection_key())
            .map(String::from)
            .collect();

        if info.map_or(false, |i| !i.playlist().is_empty()) && playlist_items.is_empty() {
            return Err(ValidationError::EmptyPlaylistSelection);
        }

        Ok(DownloadRequest {
            url,
            video_format_id: match audio_only {
                true => None,
                false => self.video_format.clone(),
            },
            audio_format_id: self.audio_format.clone(),
            audio_only,
            playlist_items,
            use_thumbnail_as_cover: self.use_thumbnail_as_cover,
            title_override: info.map(|i| i.title.clone()),
            thumbnail_url_override: info.and_then(|i| i.thumbnail_url.clone()),
        })
    }

    /// Handles the reply of the download submission. Returns the job to poll.
    pub fn download_acknowledged(
        &mut self,
        request_id: Uuid,
        ack: DownloadAck,
    ) -> Option<JobHandle> {
        if self.pending != Pending::Download(request_id) {
            log::debug!("discarding download reply of abandoned request {}", request_id);
            return None;
        }

        match (ack.success, ack.task_id.filter(|id| !id.is_empty())) {
            (true, Some(task_id)) => {
                let job = JobHandle::new(task_id);

                self.pending = Pending::Nothing;
                self.push_log(format!("Download job started (task id: {})", job), LogLevel::Info);
                self.status_text = String::from("Waiting for job...");
                self.active_job = Some(job.clone());
                Some(job)
            }
            _ => {
                let message = ack
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| String::from("could not create download job"));

                self.fail_download(message);
                None
            }
        }
    }

    pub fn download_failed(&mut self, request_id: Uuid, err: &FetchError) {
        if self.pending != Pending::Download(request_id) {
            log::debug!("discarding download error of abandoned request {}: {}", request_id, err);
            return;
        }

        self.fail_download(err.to_string());
    }

    fn fail_download(&mut self, reason: String) {
        let message = format!("Download request error: {}", reason);

        log::error!("{}", message);
        self.pending = Pending::Nothing;
        self.active_job = None;
        self.status_text = message.clone();
        self.push_log(message, LogLevel::Error);
        self.controls = Controls::all(true);
    }

    /// Applies one poll result of `job`.
    pub fn poll_tick(
        &mut self,
        job: &JobHandle,
        result: Result<ProgressSnapshot, FetchError>,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.active_job.as_ref() != Some(job) {
            log::debug!("ignoring progress of inactive job {}", job);
            return outcome;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) if err.is_not_found() => {
                log::warn!("progress polling for {} failed: {}", job, err);
                self.active_job = None;
                self.status_text = String::from("Job not found (already cleaned up).");
                self.controls = Controls::all(true);
                outcome.stop_polling = true;
                return outcome;
            }
            Err(err) => {
                log::warn!("progress polling for {} failed: {}", job, err);
                return outcome;
            }
        };

        self.status_text = snapshot
            .status_text()
            .unwrap_or("Updating status...")
            .to_string();
        self.progress = snapshot.progress.clamp(0.0, 100.0);
        self.log = snapshot
            .logs
            .iter()
            .map(|text| LogLine {
                text: text.clone(),
                level: LogLevel::Info,
            })
            .collect();

        if let Some(file) = &snapshot.newly_completed_file {
            outcome.auto_downloads.extend(self.process_completed_file(file));
        }
        self.reconcile(&snapshot, &mut outcome);

        if snapshot.is_finished() {
            self.finish(&snapshot, &mut outcome);
        }

        outcome
    }

    fn reconcile(&mut self, snapshot: &ProgressSnapshot, outcome: &mut TickOutcome) {
        for file in snapshot.completed_files() {
            outcome.auto_downloads.extend(self.process_completed_file(file));
        }
    }

    fn finish(&mut self, snapshot: &ProgressSnapshot, outcome: &mut TickOutcome) {
        self.active_job = None;
        outcome.stop_polling = true;

        self.status_text = match snapshot.status_text() {
            Some(text) => text.to_string(),
            None if snapshot.state == JobState::Success => String::from("Done"),
            None => String::from("Finished"),
        };

        self.reconcile(snapshot, outcome);

        match snapshot.state {
            JobState::Success
                if snapshot.completed_files().is_empty() && self.downloaded_files.is_empty() =>
            {
                self.push_log(
                    "Completed, but there are no files to download.".into(),
                    LogLevel::Info,
                )
            }
            JobState::Failure => self.push_log(
                format!(
                    "Job failed: {}",
                    snapshot.status_text().unwrap_or("unknown error")
                ),
                LogLevel::Error,
            ),
            _ => {}
        }

        self.controls = Controls::all(true);
    }

    /// Surfaces a completed file once per job. Returns the file when it has to be
    /// downloaded automatically.
    pub fn process_completed_file(&mut self, file: &CompletedFile) -> Option<CompletedFile> {
        if file.name.is_empty() || self.processed_files.contains(&file.name) {
            return None;
        }

        self.downloaded_files.push(file.clone());
        self.processed_files.insert(file.name.clone());

        match self.auto_download {
            true => {
                self.push_log(
                    format!("Starting automatic download of \"{}\"...", file.name),
                    LogLevel::Info,
                );
                Some(file.clone())
            }
            false => None,
        }
    }

    /// Records a line in the visible log, e.g. after an automatic download was triggered.
    pub fn note(&mut self, text: String) {
        self.push_log(text, LogLevel::Info);
    }

    fn reject(&mut self, err: ValidationError) -> ValidationError {
        self.push_log(err.to_string(), LogLevel::Error);
        err
    }

    fn push_log(&mut self, text: String, level: LogLevel) {
        self.log.push(LogLine { text, level });
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn video_info(&self) -> Option<&VideoInfo> {
        self.video_info.as_ref()
    }

    pub fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub fn title_text(&self) -> &str {
        &self.title_text
    }

    pub fn video_format(&self) -> Option<&str> {
        self.video_format.as_deref()
    }

    pub fn audio_format(&self) -> Option<&str> {
        self.audio_format.as_deref()
    }

    pub fn playlist(&self) -> &[PlaylistChoice] {
        &self.playlist
    }

    pub fn playlist_visible(&self) -> bool {
        self.info_visible && !self.playlist.is_empty()
    }

    pub fn use_thumbnail_as_cover(&self) -> bool {
        self.use_thumbnail_as_cover
    }

    pub fn auto_download(&self) -> bool {
        self.auto_download
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn progress_visible(&self) -> bool {
        self.progress_visible
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn log(&self) -> &[LogLine] {
        &self.log
    }

    pub fn downloaded_files(&self) -> &[CompletedFile] {
        &self.downloaded_files
    }

    pub fn active_job(&self) -> Option<&JobHandle> {
        self.active_job.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::FormatOption;

    fn file(name: &str) -> CompletedFile {
        CompletedFile {
            name: name.into(),
            url: format!("/f/{}", name),
        }
    }

    fn format(id: &str, ext: &str) -> FormatOption {
        FormatOption {
            format_id: id.into(),
            ext: ext.into(),
            ..Default::default()
        }
    }

    fn info() -> VideoInfo {
        VideoInfo {
            title: "T".into(),
            thumbnail_url: Some("https://img.example.com/t.jpg".into()),
            original_url: "https://example.com/watch?v=t".into(),
            video_formats: vec![format("v1", "mp4")],
            audio_formats: vec![format("a1", "m4a")],
            playlist_entries: Some(vec![]),
            ..Default::default()
        }
    }

    fn playlist_info() -> VideoInfo {
        VideoInfo {
            playlist_entries: Some(vec![
                PlaylistEntry {
                    id: Some("one".into()),
                    ..Default::default()
                },
                PlaylistEntry {
                    url: Some("https://example.com/two".into()),
                    title: Some("Two".into()),
                    ..Default::default()
                },
            ]),
            ..info()
        }
    }

    fn fetched(info: VideoInfo) -> ClientController {
        let mut controller = ClientController::new(&ClientConfig::default());

        controller.set_url_input(String::from("  https://example.com/watch?v=t "));
        let (request_id, _) = controller.begin_fetch().unwrap();
        controller.fetch_succeeded(request_id, info);
        controller
    }

    fn polling() -> (ClientController, JobHandle) {
        let mut controller = fetched(info());

        let (request_id, _) = controller.begin_download(false).unwrap();
        let job = controller
            .download_acknowledged(request_id, accepted("job-1"))
            .unwrap();

        (controller, job)
    }

    fn accepted(task_id: &str) -> DownloadAck {
        DownloadAck {
            success: true,
            task_id: Some(task_id.into()),
            error: None,
        }
    }

    fn progress(progress: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            state: JobState::Progress,
            progress,
            status_text: Some("downloading".into()),
            ..Default::default()
        }
    }

    #[test]
    fn initial_state() {
        let controller = ClientController::new(&ClientConfig::default());

        assert_eq!(controller.controls(), Controls::initial());
        assert!(controller.auto_download());
        assert!(!controller.use_thumbnail_as_cover());
        assert!(!controller.info_visible());
        assert!(!controller.progress_visible());
        assert!(controller.log().is_empty());
        assert_eq!(controller.active_job(), None);
    }

    #[test]
    fn preloaded_url_fills_input_and_logs() {
        let config = ClientConfig {
            preload_url: Some("https://youtu.be/abc".into()),
            ..Default::default()
        };
        let controller = ClientController::new(&config);

        assert_eq!(controller.url_input(), "https://youtu.be/abc");
        assert_eq!(controller.log().len(), 1);
        assert!(controller.log()[0].text.contains("https://youtu.be/abc"));
    }

    #[test]
    fn empty_url_fails_locally() {
        let mut controller = ClientController::new(&ClientConfig::default());

        controller.set_url_input("   ".into());
        assert_eq!(controller.begin_fetch(), Err(ValidationError::EmptyUrl));
        assert_eq!(controller.log().last().unwrap().level, LogLevel::Error);
        assert!(controller.controls().fetch);
    }

    #[test]
    fn fetch_disables_controls_while_in_flight() {
        let mut controller = ClientController::new(&ClientConfig::default());

        controller.set_url_input(" https://example.com/v ".into());
        let (_, request) = controller.begin_fetch().unwrap();

        assert_eq!(request.url, "https://example.com/v");
        assert_eq!(controller.controls(), Controls::all(false));
        assert_eq!(controller.title_text(), "Loading info...");
    }

    #[test]
    fn fetch_populates_single_formats_without_playlist() {
        let controller = fetched(info());

        assert!(controller.info_visible());
        assert_eq!(controller.video_format(), Some("v1"));
        assert_eq!(controller.audio_format(), Some("a1"));
        assert_eq!(controller.video_info().unwrap().video_formats.len(), 1);
        assert_eq!(controller.video_info().unwrap().audio_formats.len(), 1);
        assert!(!controller.playlist_visible());
        assert_eq!(controller.controls(), Controls::all(true));
        assert_eq!(controller.title_text(), "T");
    }

    #[test]
    fn fetch_prefers_known_default_format() {
        let controller = fetched(VideoInfo {
            video_formats: vec![format("18", "mp4"), format("22", "mp4")],
            default_video_format_id: Some("22".into()),
            default_audio_format_id: Some("missing".into()),
            ..info()
        });

        assert_eq!(controller.video_format(), Some("22"));
        assert_eq!(controller.audio_format(), Some("a1"));
    }

    #[test]
    fn fetch_shows_prechecked_playlist() {
        let controller = fetched(playlist_info());

        assert!(controller.playlist_visible());
        assert_eq!(controller.playlist().len(), 2);
        assert!(controller.playlist().iter().all(|c| c.checked));
    }

    #[test]
    fn failed_fetch_keeps_previous_info() {
        let mut controller = fetched(info());

        let (request_id, _) = controller.begin_fetch().unwrap();
        controller.fetch_failed(request_id, &FetchError::from_status(500, None));

        assert_eq!(controller.video_info(), Some(&info()));
        assert!(!controller.info_visible());
        assert_eq!(controller.title_text(), "Error");
        assert!(controller.status_text().contains("HTTP error 500"));
        assert!(controller.controls().fetch);
        assert!(!controller.controls().download);
    }

    #[test]
    fn reply_after_reset_is_discarded() {
        let mut controller = ClientController::new(&ClientConfig::default());

        controller.set_url_input("https://example.com/v".into());
        let (request_id, _) = controller.begin_fetch().unwrap();
        controller.reset();
        controller.fetch_succeeded(request_id, info());

        assert_eq!(controller.video_info(), None);
        assert!(!controller.info_visible());
    }

    #[test]
    fn abandoned_info_reply_does_not_answer_next_fetch() {
        let mut controller = ClientController::new(&ClientConfig::default());
        let first = VideoInfo {
            title: "A".into(),
            original_url: "https://example.com/A".into(),
            ..info()
        };
        let second = VideoInfo {
            title: "B".into(),
            original_url: "https://example.com/B".into(),
            ..info()
        };

        controller.set_url_input("https://example.com/A".into());
        let (abandoned, _) = controller.begin_fetch().unwrap();
        controller.reset();
        controller.set_url_input("https://example.com/B".into());
        let (current, _) = controller.begin_fetch().unwrap();

        controller.fetch_succeeded(abandoned, first);
        assert_eq!(controller.video_info(), None);
        assert_eq!(controller.controls(), Controls::all(false));

        controller.fetch_failed(abandoned, &FetchError::Transport("offline".into()));
        assert_eq!(controller.title_text(), "Loading info...");

        controller.fetch_succeeded(current, second.clone());
        assert_eq!(controller.video_info(), Some(&second));
        assert_eq!(controller.title_text(), "B");
    }

    #[test]
    fn abandoned_download_reply_does_not_start_polling() {
        let mut controller = fetched(info());

        let (abandoned, _) = controller.begin_download(false).unwrap();
        controller.reset();
        controller.set_url_input("https://example.com/B".into());
        let (current, _) = controller.begin_download(false).unwrap();

        assert_eq!(controller.download_acknowledged(abandoned, accepted("job-A")), None);
        controller.download_failed(abandoned, &FetchError::from_status(500, None));
        assert_eq!(controller.active_job(), None);
        assert_eq!(controller.controls(), Controls::all(false));

        assert_eq!(
            controller.download_acknowledged(current, accepted("job-B")),
            Some(JobHandle::new("job-B"))
        );
        assert_eq!(controller.active_job(), Some(&JobHandle::new("job-B")));
    }

    #[test]
    fn download_request_carries_selection_and_overrides() {
        let mut controller = fetched(playlist_info());

        controller.set_playlist_item(0, false);
        controller.set_use_thumbnail_as_cover(true);
        let (_, request) = controller.begin_download(false).unwrap();

        assert_eq!(
            request,
            DownloadRequest {
                url: "https://example.com/watch?v=t".into(),
                video_format_id: Some("v1".into()),
                audio_format_id: Some("a1".into()),
                audio_only: false,
                playlist_items: vec!["https://example.com/two".into()],
                use_thumbnail_as_cover: true,
                title_override: Some("T".into()),
                thumbnail_url_override: Some("https://img.example.com/t.jpg".into()),
            }
        );
        assert!(controller.progress_visible());
        assert_eq!(controller.controls(), Controls::all(false));
    }

    #[test]
    fn audio_only_sends_null_video_format() {
        let mut controller = fetched(info());

        controller.select_video_format(String::new());
        let (_, request) = controller.begin_download(true).unwrap();

        assert_eq!(request.video_format_id, None);
        assert!(request.audio_only);
    }

    #[test]
    fn download_without_info_uses_input_url() {
        let mut controller = ClientController::new(&ClientConfig::default());

        assert_eq!(
            controller.begin_download(false),
            Err(ValidationError::MissingUrl)
        );

        controller.set_url_input(" https://example.com/raw ".into());
        let (_, request) = controller.begin_download(false).unwrap();

        assert_eq!(request.url, "https://example.com/raw");
        assert_eq!(request.title_override, None);
        assert!(request.playlist_items.is_empty());
    }

    #[test]
    fn missing_video_format_fails_locally() {
        let mut controller = fetched(info());

        controller.select_video_format(String::new());
        assert_eq!(
            controller.begin_download(false),
            Err(ValidationError::MissingVideoFormat)
        );
        assert_eq!(controller.controls(), Controls::all(true));
        assert!(!controller.progress_visible());
        assert_eq!(controller.log().last().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn missing_audio_format_fails_locally() {
        let mut controller = fetched(info());

        controller.select_audio_format(String::new());
        assert_eq!(
            controller.begin_download(true),
            Err(ValidationError::MissingAudioFormat)
        );
    }

    #[test]
    fn empty_playlist_selection_fails_locally() {
        let mut controller = fetched(playlist_info());

        controller.set_all_playlist_items(false);
        assert_eq!(
            controller.begin_download(false),
            Err(ValidationError::EmptyPlaylistSelection)
        );

        controller.set_all_playlist_items(true);
        assert_eq!(controller.begin_download(false).unwrap().1.playlist_items.len(), 2);
    }

    #[test]
    fn rejected_download_restores_controls() {
        let mut controller = fetched(info());

        let (request_id, _) = controller.begin_download(false).unwrap();
        let job = controller.download_acknowledged(
            request_id,
            DownloadAck {
                success: false,
                task_id: None,
                error: Some("queue full".into()),
            },
        );

        assert_eq!(job, None);
        assert_eq!(controller.active_job(), None);
        assert_eq!(controller.controls(), Controls::all(true));
        assert!(controller.status_text().contains("queue full"));
    }

    #[test]
    fn success_without_task_id_is_a_failure() {
        let mut controller = fetched(info());

        let (request_id, _) = controller.begin_download(false).unwrap();
        assert_eq!(
            controller.download_acknowledged(
                request_id,
                DownloadAck {
                    success: true,
                    ..Default::default()
                }
            ),
            None
        );
        assert_eq!(controller.controls(), Controls::all(true));
    }

    #[test]
    fn failed_submission_restores_controls() {
        let mut controller = fetched(info());

        let (request_id, _) = controller.begin_download(false).unwrap();
        controller.download_failed(request_id, &FetchError::Transport("offline".into()));

        assert_eq!(controller.controls(), Controls::all(true));
        assert_eq!(controller.active_job(), None);
    }

    #[test]
    fn tick_replaces_log_and_updates_progress() {
        let (mut controller, job) = polling();

        let outcome = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                logs: vec!["one".into(), "two".into()],
                ..progress(40.0)
            }),
        );
        assert!(!outcome.stop_polling);
        assert_eq!(controller.progress(), 40.0);
        assert_eq!(controller.status_text(), "downloading");
        assert_eq!(controller.log().len(), 2);

        controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                logs: vec!["three".into()],
                status_text: None,
                ..progress(150.0)
            }),
        );
        assert_eq!(controller.log().len(), 1);
        assert_eq!(controller.log()[0].text, "three");
        assert_eq!(controller.progress(), 100.0);
    }

    #[test]
    fn completed_file_is_surfaced_once_across_sources() {
        let (mut controller, job) = polling();

        let first = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("song.mp3")),
                ..progress(50.0)
            }),
        );
        let second = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("song.mp3")),
                all_completed_files: Some(vec![file("song.mp3")]),
                ..progress(60.0)
            }),
        );
        let last = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                state: JobState::Success,
                all_completed_files: Some(vec![file("song.mp3")]),
                ..progress(100.0)
            }),
        );

        assert_eq!(first.auto_downloads, vec![file("song.mp3")]);
        assert!(second.auto_downloads.is_empty());
        assert!(last.auto_downloads.is_empty());
        assert_eq!(controller.downloaded_files(), &[file("song.mp3")]);
    }

    #[test]
    fn reconciliation_picks_up_missed_files() {
        let (mut controller, job) = polling();

        let outcome = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("b.mp3")),
                all_completed_files: Some(vec![file("a.mp3"), file("b.mp3"), file("")]),
                ..progress(70.0)
            }),
        );

        assert_eq!(outcome.auto_downloads, vec![file("b.mp3"), file("a.mp3")]);
        assert_eq!(controller.downloaded_files().len(), 2);
    }

    #[test]
    fn disabled_auto_download_only_renders_links() {
        let (mut controller, job) = polling();

        controller.set_auto_download(false);
        let outcome = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("clip.mp4")),
                ..progress(10.0)
            }),
        );

        assert!(outcome.auto_downloads.is_empty());
        assert_eq!(controller.downloaded_files(), &[file("clip.mp4")]);
    }

    #[test]
    fn terminal_state_stops_polling() {
        for state in [JobState::Success, JobState::Failure, JobState::Revoked] {
            let (mut controller, job) = polling();
            let outcome = controller.poll_tick(
                &job,
                Ok(ProgressSnapshot {
                    state,
                    ..progress(30.0)
                }),
            );

            assert!(outcome.stop_polling);
            assert_eq!(controller.active_job(), None);
            assert_eq!(controller.controls(), Controls::all(true));
        }
    }

    #[test]
    fn full_progress_stops_polling_before_terminal_state() {
        let (mut controller, job) = polling();

        let outcome = controller.poll_tick(&job, Ok(progress(100.0)));
        assert!(outcome.stop_polling);

        let late = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("late.mp3")),
                ..progress(100.0)
            }),
        );
        assert_eq!(late, TickOutcome::default());
        assert!(controller.downloaded_files().is_empty());
    }

    #[test]
    fn not_found_halts_polling_mid_job() {
        let (mut controller, job) = polling();

        controller.poll_tick(&job, Ok(progress(20.0)));
        let outcome = controller.poll_tick(&job, Err(FetchError::from_status(404, None)));

        assert!(outcome.stop_polling);
        assert_eq!(controller.status_text(), "Job not found (already cleaned up).");
        assert_eq!(controller.controls(), Controls::all(true));
        assert_eq!(controller.active_job(), None);
    }

    #[test]
    fn transient_errors_keep_polling() {
        let (mut controller, job) = polling();

        controller.poll_tick(&job, Ok(progress(20.0)));
        let outcome = controller.poll_tick(&job, Err(FetchError::from_status(503, None)));
        assert!(!outcome.stop_polling);

        let outcome = controller.poll_tick(&job, Err(FetchError::Decode("eof".into())));
        assert!(!outcome.stop_polling);
        assert_eq!(controller.active_job(), Some(&job));
        assert_eq!(controller.progress(), 20.0);
        assert_eq!(controller.controls(), Controls::all(false));
    }

    #[test]
    fn stale_job_ticks_are_ignored() {
        let (mut controller, job) = polling();
        let stale = JobHandle::new("job-0");

        let outcome = controller.poll_tick(&stale, Err(FetchError::from_status(404, None)));

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(controller.active_job(), Some(&job));
    }

    #[test]
    fn success_without_files_is_noted() {
        let (mut controller, job) = polling();

        controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                state: JobState::Success,
                status_text: None,
                ..progress(100.0)
            }),
        );

        assert_eq!(controller.status_text(), "Done");
        assert!(controller
            .log()
            .iter()
            .any(|l| l.text.contains("no files to download")));
    }

    #[test]
    fn failure_is_logged_as_error() {
        let (mut controller, job) = polling();

        controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                state: JobState::Failure,
                status_text: Some("extraction failed".into()),
                ..progress(100.0)
            }),
        );

        let last = controller.log().last().unwrap();
        assert_eq!(last.level, LogLevel::Error);
        assert_eq!(last.text, "Job failed: extraction failed");
    }

    #[test]
    fn new_submission_clears_processed_files() {
        let (mut controller, job) = polling();

        controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("song.mp3")),
                ..progress(100.0)
            }),
        );
        let (request_id, _) = controller.begin_download(false).unwrap();
        let job = controller
            .download_acknowledged(request_id, accepted("job-2"))
            .unwrap();

        assert!(controller.downloaded_files().is_empty());
        let outcome = controller.poll_tick(
            &job,
            Ok(ProgressSnapshot {
                newly_completed_file: Some(file("song.mp3")),
                ..progress(50.0)
            }),
        );
        assert_eq!(outcome.auto_downloads, vec![file("song.mp3")]);
    }

    #[test]
    fn reset_returns_active_job_and_restores_defaults() {
        let config = ClientConfig {
            auto_download: false,
            ..Default::default()
        };
        let mut controller = ClientController::new(&config);

        controller.set_url_input("https://example.com/v".into());
        controller.set_auto_download(true);
        let (request_id, _) = controller.begin_download(false).unwrap();
        controller.download_acknowledged(request_id, accepted("job-9"));

        assert_eq!(controller.reset(), Some(JobHandle::new("job-9")));
        assert_eq!(controller.url_input(), "");
        assert!(!controller.auto_download());
        assert_eq!(controller.controls(), Controls::initial());
        assert_eq!(controller.reset(), None);
    }
}
