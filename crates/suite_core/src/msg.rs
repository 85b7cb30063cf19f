use crate::{Attachment, LogEvent, SubmissionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the request text.
    InputChanged(String),
    /// User picked a file. Replaces any previously picked file.
    FileSelected(Attachment),
    /// User removed the file chip with this name.
    FileRemoved { name: String },
    /// User submitted the current text and attachment.
    SubmitClicked,
    /// User clicked the home affordance.
    ResetClicked,
    /// The event stream connection for a submission is established.
    StreamOpened { submission: SubmissionId },
    /// A decoded log line arrived on the event stream.
    LogReceived {
        submission: SubmissionId,
        event: LogEvent,
    },
    /// The server ended the event stream.
    StreamEnded { submission: SubmissionId },
    /// The event stream hit a transport error and was closed.
    StreamFailed {
        submission: SubmissionId,
        reason: String,
    },
    /// The generation request resolved with an artifact URL.
    GenerationSucceeded {
        submission: SubmissionId,
        artifact_url: String,
    },
    /// The generation request failed.
    GenerationFailed {
        submission: SubmissionId,
        reason: String,
    },
    /// The embedded preview reported that it finished loading.
    PreviewLoaded { submission: SubmissionId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
