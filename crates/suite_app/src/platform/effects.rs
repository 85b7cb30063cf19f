use std::sync::{mpsc, Arc};

use suite_client::{
    AttachmentSource, ClientEvent, ClientHandle, ClientSettings, EventSink, GenerationInput,
    ReqwestGenerator,
};
use suite_core::{Effect, GenerationRequest, LogEvent, Msg};
use suite_logging::{suite_info, suite_warn};

pub(crate) struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub(crate) fn new(settings: ClientSettings, msg_tx: mpsc::Sender<Msg>) -> Self {
        let generator = Arc::new(ReqwestGenerator::new(settings.clone()));
        let client = ClientHandle::with_sink(settings, generator, Arc::new(MsgSink { msg_tx }));
        Self { client }
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenStream { submission } => self.client.open_stream(submission),
                Effect::CloseStream { submission } => self.client.close_stream(submission),
                Effect::SendGeneration {
                    submission,
                    request,
                } => {
                    suite_info!(
                        "SendGeneration submission={} text_len={}",
                        submission,
                        request.text.len()
                    );
                    self.client.generate(submission, to_input(request));
                }
                Effect::CancelGeneration { submission } => {
                    self.client.cancel_generation(submission)
                }
                Effect::LoadPreview { submission, url } => {
                    self.client.load_preview(submission, url)
                }
            }
        }
    }
}

/// Forwards client events into the update loop as messages.
struct MsgSink {
    msg_tx: mpsc::Sender<Msg>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: ClientEvent) {
        if let Some(msg) = map_event(event) {
            let _ = self.msg_tx.send(msg);
        }
    }
}

fn to_input(request: GenerationRequest) -> GenerationInput {
    GenerationInput {
        text: request.text,
        attachment: request.attachment.map(|attachment| AttachmentSource {
            name: attachment.name,
            path: attachment.path,
        }),
    }
}

fn map_event(event: ClientEvent) -> Option<Msg> {
    let msg = match event {
        ClientEvent::StreamOpened { submission } => Msg::StreamOpened { submission },
        ClientEvent::StreamLog { submission, line } => Msg::LogReceived {
            submission,
            event: LogEvent::new(line.sequence, line.text, line.received_at),
        },
        ClientEvent::StreamClosed { submission } => Msg::StreamEnded { submission },
        ClientEvent::StreamFailed { submission, error } => Msg::StreamFailed {
            submission,
            reason: error.to_string(),
        },
        ClientEvent::GenerationCompleted { submission, result } => match result {
            Ok(output) => Msg::GenerationSucceeded {
                submission,
                artifact_url: output.artifact_url,
            },
            Err(error) => Msg::GenerationFailed {
                submission,
                reason: error.to_string(),
            },
        },
        ClientEvent::PreviewLoaded { submission, result } => match result {
            Ok(document) => {
                suite_info!(
                    "Preview for submission {} loaded ({} bytes from {})",
                    submission,
                    document.byte_len,
                    document.final_url
                );
                Msg::PreviewLoaded { submission }
            }
            Err(error) => {
                // The overlay stays up; only a new submission or reset clears it.
                suite_warn!("Preview for submission {} failed: {}", submission, error);
                return None;
            }
        },
    };
    Some(msg)
}
