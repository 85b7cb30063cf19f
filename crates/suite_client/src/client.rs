use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;

use suite_logging::{suite_debug, suite_error};
use tokio_util::sync::CancellationToken;

use crate::sink::ChannelEventSink;
use crate::stream::{EventStreamConsumer, StreamSlot};
use crate::{
    ClientError, ClientEvent, ClientSettings, EventSink, FailureKind, GenerationInput, Generator,
    PreviewLoader, ReqwestGenerator, SubmissionId,
};

enum ClientCommand {
    Generate {
        submission: SubmissionId,
        input: GenerationInput,
    },
    CancelGeneration {
        submission: SubmissionId,
    },
    OpenStream {
        submission: SubmissionId,
    },
    CloseStream {
        submission: SubmissionId,
    },
    LoadPreview {
        submission: SubmissionId,
        url: String,
    },
}

/// Front of the IO thread. Commands go in, [`ClientEvent`]s come out.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    /// Present unless events are delivered to a caller-provided sink.
    event_rx: Option<mpsc::Receiver<ClientEvent>>,
}

impl ClientHandle {
    pub fn new(settings: ClientSettings) -> Self {
        let generator = Arc::new(ReqwestGenerator::new(settings.clone()));
        Self::with_generator(settings, generator)
    }

    pub fn with_generator(settings: ClientSettings, generator: Arc<dyn Generator>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let sink = Arc::new(ChannelEventSink::new(event_tx));
        Self {
            cmd_tx: spawn_worker(settings, generator, sink),
            event_rx: Some(event_rx),
        }
    }

    /// Delivers events straight to `sink` from the IO threads; `try_recv` stays empty.
    pub fn with_sink(
        settings: ClientSettings,
        generator: Arc<dyn Generator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            cmd_tx: spawn_worker(settings, generator, sink),
            event_rx: None,
        }
    }

    pub fn generate(&self, submission: SubmissionId, input: GenerationInput) {
        let _ = self
            .cmd_tx
            .send(ClientCommand::Generate { submission, input });
    }

    pub fn cancel_generation(&self, submission: SubmissionId) {
        let _ = self
            .cmd_tx
            .send(ClientCommand::CancelGeneration { submission });
    }

    pub fn open_stream(&self, submission: SubmissionId) {
        let _ = self.cmd_tx.send(ClientCommand::OpenStream { submission });
    }

    pub fn close_stream(&self, submission: SubmissionId) {
        let _ = self.cmd_tx.send(ClientCommand::CloseStream { submission });
    }

    pub fn load_preview(&self, submission: SubmissionId, url: impl Into<String>) {
        let _ = self.cmd_tx.send(ClientCommand::LoadPreview {
            submission,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.as_ref()?.try_recv().ok()
    }
}

fn spawn_worker(
    settings: ClientSettings,
    generator: Arc<dyn Generator>,
    sink: Arc<dyn EventSink>,
) -> mpsc::Sender<ClientCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(err) => {
                suite_error!("Failed to start client runtime: {}", err);
                return;
            }
        };
        let mut worker = Worker {
            generator,
            consumer: EventStreamConsumer::new(settings.clone()),
            preview: PreviewLoader::new(settings),
            sink,
            streams: StreamSlot::new(),
            generations: HashMap::new(),
        };
        while let Ok(command) = cmd_rx.recv() {
            // Spawned tasks need the runtime context.
            let _guard = runtime.enter();
            worker.handle(command);
        }
        worker.streams.close_current();
    });

    cmd_tx
}

struct Worker {
    generator: Arc<dyn Generator>,
    consumer: EventStreamConsumer,
    preview: PreviewLoader,
    sink: Arc<dyn EventSink>,
    streams: StreamSlot,
    /// Tokens of generation requests; a finished task cancels its own token.
    generations: HashMap<SubmissionId, CancellationToken>,
}

impl Worker {
    fn handle(&mut self, command: ClientCommand) {
        match command {
            ClientCommand::Generate { submission, input } => {
                self.generations.retain(|_, token| !token.is_cancelled());
                let token = CancellationToken::new();
                self.generations.insert(submission, token.clone());
                let generator = self.generator.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    let result = tokio::select! {
                        _ = token.cancelled() => Err(ClientError::new(
                            FailureKind::Cancelled,
                            "generation cancelled",
                        )),
                        result = generator.generate(submission, &input) => result,
                    };
                    token.cancel();
                    sink.emit(ClientEvent::GenerationCompleted { submission, result });
                });
            }
            ClientCommand::CancelGeneration { submission } => {
                if let Some(token) = self.generations.remove(&submission) {
                    suite_debug!("Cancelling generation for submission {}", submission);
                    token.cancel();
                }
            }
            ClientCommand::OpenStream { submission } => {
                let consumer = &self.consumer;
                let sink = self.sink.clone();
                self.streams.open_with(|| consumer.open(submission, sink));
            }
            ClientCommand::CloseStream { submission } => {
                self.streams.close(submission);
            }
            ClientCommand::LoadPreview { submission, url } => {
                let preview = self.preview.clone();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    let result = preview.load(&url).await;
                    sink.emit(ClientEvent::PreviewLoaded { submission, result });
                });
            }
        }
    }
}
