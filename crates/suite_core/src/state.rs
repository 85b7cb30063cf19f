use chrono::Local;
use suite_logging::{suite_debug, suite_warn};

use crate::submission::{StreamStatus, Submission};
use crate::view_model::{AppViewModel, LogLineView};
use crate::{
    Attachment, AttachmentTracker, Effect, GenerationRequest, LogBuffer, LogEvent, PreviewGate,
    SubmissionId, SubmissionStatus,
};

/// The single state object owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input_text: String,
    attachments: AttachmentTracker,
    submission: Option<Submission>,
    log: LogBuffer,
    preview: PreviewGate,
    last_issued: SubmissionId,
    failure: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status(),
            submission: self.live_submission(),
            input_text: self.input_text.clone(),
            attachment_name: self.attachments.current().map(|a| a.name.clone()),
            log_lines: self
                .log
                .entries()
                .iter()
                .map(|event| LogLineView {
                    sequence_index: event.sequence_index,
                    text: event.text.clone(),
                    received_at: event
                        .received_at
                        .with_timezone(&Local)
                        .format("%H:%M:%S")
                        .to_string(),
                })
                .collect(),
            anchored_index: self.log.tail().map(|event| event.sequence_index),
            artifact_url: self.preview.artifact_url().map(ToOwned::to_owned),
            overlay_visible: self.preview.is_overlay_visible(),
            show_preview: self.preview.should_render_content(),
            failure: self.failure.clone(),
            dirty: self.dirty,
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        self.submission
            .as_ref()
            .map_or(SubmissionStatus::Idle, |s| s.status)
    }

    pub fn live_submission(&self) -> Option<SubmissionId> {
        self.submission.as_ref().map(|s| s.id)
    }

    /// True when a stream connection is believed to be held for the live submission.
    pub fn has_open_stream(&self) -> bool {
        self.submission
            .as_ref()
            .is_some_and(|s| s.stream.holds_connection())
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachments.current()
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    pub fn preview(&self) -> &PreviewGate {
        &self.preview
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input_text != text {
            self.input_text = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_attachment(&mut self, attachment: Attachment) {
        self.attachments.select(attachment);
        self.mark_dirty();
    }

    pub(crate) fn remove_attachment(&mut self, name: &str) {
        if self.attachments.remove(name) {
            self.mark_dirty();
        }
    }

    /// The request to send, or `None` when there is neither text nor a file.
    pub(crate) fn pending_request(&self) -> Option<GenerationRequest> {
        let attachment = self.attachments.current().cloned();
        if self.input_text.trim().is_empty() && attachment.is_none() {
            return None;
        }
        Some(GenerationRequest {
            text: self.input_text.clone(),
            attachment,
        })
    }

    /// Starts a fresh submission. Effects releasing the previous one come first.
    pub(crate) fn begin_submission(&mut self) -> (SubmissionId, Vec<Effect>) {
        let mut effects = self.release_submission();
        self.last_issued += 1;
        let id = self.last_issued;
        self.submission = Some(Submission::start(id));
        self.log.reset();
        self.preview.reset();
        self.failure = None;
        self.mark_dirty();
        effects.push(Effect::OpenStream { submission: id });
        (id, effects)
    }

    /// Returns everything to initial values except the id counter.
    pub(crate) fn reset(&mut self) -> Vec<Effect> {
        let effects = self.release_submission();
        if let Some(dropped) = self.attachments.clear() {
            suite_debug!("Reset dropped attachment {}", dropped.name);
        }
        let last_issued = self.last_issued;
        *self = Self {
            last_issued,
            dirty: true,
            ..Self::default()
        };
        effects
    }

    fn release_submission(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(prior) = self.submission.as_mut() {
            if prior.status.is_in_flight() {
                effects.push(Effect::CancelGeneration {
                    submission: prior.id,
                });
            }
            if prior.stream.holds_connection() {
                prior.stream = StreamStatus::Closed;
                effects.push(Effect::CloseStream {
                    submission: prior.id,
                });
            }
        }
        effects
    }

    /// The live submission if `id` matches it. Anything else is stale.
    fn live_mut(&mut self, id: SubmissionId, what: &str) -> Option<&mut Submission> {
        match self.submission.as_mut() {
            Some(submission) if submission.id == id => Some(submission),
            _ => {
                suite_debug!("Dropping stale {} for submission {}", what, id);
                None
            }
        }
    }

    pub(crate) fn stream_opened(&mut self, id: SubmissionId) {
        let Some(submission) = self.live_mut(id, "stream open") else {
            return;
        };
        if submission.stream == StreamStatus::Opening {
            submission.stream = StreamStatus::Open;
        }
        if submission.status == SubmissionStatus::Submitting {
            submission.status = SubmissionStatus::Streaming;
            self.mark_dirty();
        }
    }

    pub(crate) fn append_log(&mut self, id: SubmissionId, event: LogEvent) {
        let Some(submission) = self.live_mut(id, "log event") else {
            return;
        };
        if submission.stream == StreamStatus::Failed {
            suite_debug!("Dropping log event after stream failure for submission {}", id);
            return;
        }
        match self.log.append(event) {
            Ok(_) => self.mark_dirty(),
            Err(err) => suite_warn!("Submission {}: {}", id, err),
        }
    }

    pub(crate) fn stream_ended(&mut self, id: SubmissionId) {
        if let Some(submission) = self.live_mut(id, "stream end") {
            if submission.stream != StreamStatus::Failed {
                submission.stream = StreamStatus::Closed;
            }
        }
    }

    /// Returns true when the stream was live and the caller must release it.
    pub(crate) fn stream_failed(&mut self, id: SubmissionId, reason: &str) -> bool {
        let Some(submission) = self.live_mut(id, "stream failure") else {
            return false;
        };
        suite_warn!("Event stream for submission {} failed: {}", id, reason);
        let was_live = submission.stream.holds_connection();
        submission.stream = StreamStatus::Failed;
        was_live
    }

    pub(crate) fn generation_succeeded(&mut self, id: SubmissionId, url: String) -> Vec<Effect> {
        let Some(submission) = self.live_mut(id, "generation result") else {
            return Vec::new();
        };
        if !submission.status.is_in_flight() {
            suite_debug!(
                "Ignoring generation result for submission {} in state {:?}",
                id,
                submission.status
            );
            return Vec::new();
        }
        submission.status = SubmissionStatus::Finished;
        let mut effects = Vec::with_capacity(2);
        if submission.stream.holds_connection() {
            submission.stream = StreamStatus::Closed;
            effects.push(Effect::CloseStream { submission: id });
        }
        if self.preview.set_artifact_url(url.clone()) {
            effects.push(Effect::LoadPreview {
                submission: id,
                url,
            });
        }
        self.mark_dirty();
        effects
    }

    pub(crate) fn generation_failed(&mut self, id: SubmissionId, reason: String) -> Vec<Effect> {
        let Some(submission) = self.live_mut(id, "generation failure") else {
            return Vec::new();
        };
        if !submission.status.is_in_flight() {
            return Vec::new();
        }
        suite_warn!("Generation for submission {} failed: {}", id, reason);
        submission.status = SubmissionStatus::Failed;
        let mut effects = Vec::new();
        if submission.stream.holds_connection() {
            submission.stream = StreamStatus::Closed;
            effects.push(Effect::CloseStream { submission: id });
        }
        self.failure = Some(reason);
        self.mark_dirty();
        effects
    }

    pub(crate) fn preview_loaded(&mut self, id: SubmissionId) {
        let Some(submission) = self.live_mut(id, "preview load") else {
            return;
        };
        if submission.status != SubmissionStatus::Finished {
            return;
        }
        if self.preview.mark_loaded() {
            self.mark_dirty();
        }
    }
}
