pub mod downloader;
pub mod format_select;
pub mod notification;
pub mod playlist_select;
pub mod progress_panel;
pub mod top;
