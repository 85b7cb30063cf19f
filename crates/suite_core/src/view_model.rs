use crate::{SubmissionId, SubmissionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: SubmissionStatus,
    pub submission: Option<SubmissionId>,
    pub input_text: String,
    pub attachment_name: Option<String>,
    pub log_lines: Vec<LogLineView>,
    /// Index of the entry the log view keeps scrolled into view.
    pub anchored_index: Option<u64>,
    pub artifact_url: Option<String>,
    pub overlay_visible: bool,
    /// Whether the embedded preview may be instantiated.
    pub show_preview: bool,
    pub failure: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLineView {
    pub sequence_index: u64,
    pub text: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub received_at: String,
}
