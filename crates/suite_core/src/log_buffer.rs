use chrono::{DateTime, Utc};
use thiserror::Error;

/// One progress line received from the event stream. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub sequence_index: u64,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

impl LogEvent {
    pub fn new(sequence_index: u64, text: impl Into<String>, received_at: DateTime<Utc>) -> Self {
        Self {
            sequence_index,
            text: text.into(),
            received_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppendError {
    #[error("out of order log event: expected index {expected}, got {actual}")]
    OutOfOrder { expected: u64, actual: u64 },
}

/// Append-only log in arrival order.
///
/// Indices are dense: the n-th appended event must carry index n. The tail is
/// the anchored entry a renderer keeps scrolled into view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogBuffer {
    entries: Vec<LogEvent>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: LogEvent) -> Result<&LogEvent, AppendError> {
        let expected = self.next_index();
        if event.sequence_index != expected {
            return Err(AppendError::OutOfOrder {
                expected,
                actual: event.sequence_index,
            });
        }
        self.entries.push(event);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEvent] {
        &self.entries
    }

    pub fn tail(&self) -> Option<&LogEvent> {
        self.entries.last()
    }

    pub fn next_index(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(index: u64, text: &str) -> LogEvent {
        LogEvent::new(index, text, Utc::now())
    }

    #[test]
    fn append_keeps_arrival_order_and_moves_tail() {
        let mut buffer = LogBuffer::new();
        buffer.append(event(0, "init")).unwrap();
        buffer.append(event(1, "parse")).unwrap();

        let texts: Vec<_> = buffer.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["init", "parse"]);
        assert_eq!(buffer.tail().map(|e| e.sequence_index), Some(1));
    }

    #[test]
    fn gaps_and_repeats_are_rejected() {
        let mut buffer = LogBuffer::new();
        buffer.append(event(0, "a")).unwrap();

        assert_eq!(
            buffer.append(event(0, "again")),
            Err(AppendError::OutOfOrder {
                expected: 1,
                actual: 0
            })
        );
        assert!(buffer.append(event(5, "skip")).is_err());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn reset_restarts_indices() {
        let mut buffer = LogBuffer::new();
        buffer.append(event(0, "a")).unwrap();
        buffer.reset();

        assert!(buffer.is_empty());
        assert_eq!(buffer.next_index(), 0);
        assert!(buffer.tail().is_none());
    }
}
