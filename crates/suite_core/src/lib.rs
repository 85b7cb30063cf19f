//! Suite core: pure submission state machine and view-model helpers.
mod attachment;
mod effect;
mod log_buffer;
mod msg;
mod preview;
mod state;
mod submission;
mod update;
mod view_model;

pub use attachment::{Attachment, AttachmentTracker};
pub use effect::Effect;
pub use log_buffer::{AppendError, LogBuffer, LogEvent};
pub use msg::Msg;
pub use preview::PreviewGate;
pub use state::AppState;
pub use submission::{GenerationRequest, StreamStatus, SubmissionId, SubmissionStatus};
pub use update::update;
pub use view_model::{AppViewModel, LogLineView};
