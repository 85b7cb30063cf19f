use crate::{GenerationRequest, SubmissionId};

/// Side effects requested by [`crate::update`]. Listed in the order they must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenStream {
        submission: SubmissionId,
    },
    CloseStream {
        submission: SubmissionId,
    },
    SendGeneration {
        submission: SubmissionId,
        request: GenerationRequest,
    },
    CancelGeneration {
        submission: SubmissionId,
    },
    /// Instantiate the embedded preview for this artifact.
    LoadPreview {
        submission: SubmissionId,
        url: String,
    },
}
