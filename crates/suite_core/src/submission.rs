use crate::Attachment;

/// Identity of one submission. Issued from a counter that never repeats, so a
/// result tagged with an old id can always be told apart from the live one.
pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Streaming,
    Finished,
    Failed,
}

impl SubmissionStatus {
    /// The generation request has been sent and has not resolved yet.
    pub fn is_in_flight(self) -> bool {
        matches!(self, SubmissionStatus::Submitting | SubmissionStatus::Streaming)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    Opening,
    Open,
    /// Closed by us or ended by the server. Events already queued still append.
    Closed,
    /// Transport error. Nothing more is appended for this submission.
    Failed,
}

impl StreamStatus {
    pub fn holds_connection(self) -> bool {
        matches!(self, StreamStatus::Opening | StreamStatus::Open)
    }
}

/// Payload of the generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub text: String,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Submission {
    pub(crate) id: SubmissionId,
    pub(crate) status: SubmissionStatus,
    pub(crate) stream: StreamStatus,
}

impl Submission {
    pub(crate) fn start(id: SubmissionId) -> Self {
        Self {
            id,
            status: SubmissionStatus::Submitting,
            stream: StreamStatus::Opening,
        }
    }
}
