//! Suite client: generation requests, event streams and preview loading.
mod client;
mod generate;
mod preview;
mod settings;
mod sink;
mod stream;
mod types;

pub use client::ClientHandle;
pub use generate::{Generator, ReqwestGenerator};
pub use preview::PreviewLoader;
pub use settings::ClientSettings;
pub use sink::{ChannelEventSink, EventSink};
pub use stream::{decode_event, run_stream, DecodedEvent, EventStreamConsumer, StreamHandle, StreamSlot};
pub use tokio_util::sync::CancellationToken;
pub use types::{
    AttachmentSource, ClientError, ClientEvent, FailureKind, GenerationInput, GenerationOutput,
    LogLine, PreviewDocument, SubmissionId,
};
