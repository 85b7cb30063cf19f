use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub type SubmissionId = u64;

/// A file to upload with the generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub text: String,
    pub attachment: Option<AttachmentSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub artifact_url: String,
}

/// The artifact as fetched for the preview surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

/// One log line decoded from the event stream, numbered from 0 per stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub sequence: u64,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    StreamOpened {
        submission: SubmissionId,
    },
    StreamLog {
        submission: SubmissionId,
        line: LogLine,
    },
    /// The server ended the stream cleanly.
    StreamClosed {
        submission: SubmissionId,
    },
    StreamFailed {
        submission: SubmissionId,
        error: ClientError,
    },
    GenerationCompleted {
        submission: SubmissionId,
        result: Result<GenerationOutput, ClientError>,
    },
    PreviewLoaded {
        submission: SubmissionId,
        result: Result<PreviewDocument, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    AttachmentUnreadable,
    AttachmentTooLarge { max_bytes: u64, actual: u64 },
    MalformedResponse,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::AttachmentUnreadable => write!(f, "attachment unreadable"),
            FailureKind::AttachmentTooLarge { max_bytes, actual } => {
                write!(f, "attachment too large (max {max_bytes}, actual {actual})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
