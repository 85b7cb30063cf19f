use suite_logging::{suite_debug, suite_info};

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::FileSelected(attachment) => {
            // Selecting never submits on its own.
            state.select_attachment(attachment);
            Vec::new()
        }
        Msg::FileRemoved { name } => {
            state.remove_attachment(&name);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let Some(request) = state.pending_request() else {
                suite_debug!("Submit ignored: no text and no attachment");
                return (state, Vec::new());
            };
            let (submission, mut effects) = state.begin_submission();
            suite_info!(
                "Submission {} started (text_len={}, attachment={:?})",
                submission,
                request.text.len(),
                request.attachment.as_ref().map(|a| a.name.as_str())
            );
            effects.push(Effect::SendGeneration {
                submission,
                request,
            });
            effects
        }
        Msg::ResetClicked => state.reset(),
        Msg::StreamOpened { submission } => {
            state.stream_opened(submission);
            Vec::new()
        }
        Msg::LogReceived { submission, event } => {
            state.append_log(submission, event);
            Vec::new()
        }
        Msg::StreamEnded { submission } => {
            state.stream_ended(submission);
            Vec::new()
        }
        Msg::StreamFailed { submission, reason } => {
            if state.stream_failed(submission, &reason) {
                vec![Effect::CloseStream { submission }]
            } else {
                Vec::new()
            }
        }
        Msg::GenerationSucceeded {
            submission,
            artifact_url,
        } => state.generation_succeeded(submission, artifact_url),
        Msg::GenerationFailed { submission, reason } => {
            state.generation_failed(submission, reason)
        }
        Msg::PreviewLoaded { submission } => {
            state.preview_loaded(submission);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
