use std::path::{Path, PathBuf};

/// A file picked by the user: its display name plus the handle used to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub path: PathBuf,
}

impl Attachment {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Builds an attachment named after the final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(Self::new(name, path))
    }
}

/// Holds at most one selected file. Selecting replaces, never appends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentTracker {
    current: Option<Attachment>,
}

impl AttachmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held file, returning the one it displaced.
    pub fn select(&mut self, attachment: Attachment) -> Option<Attachment> {
        self.current.replace(attachment)
    }

    pub fn clear(&mut self) -> Option<Attachment> {
        self.current.take()
    }

    /// Removes the held file only when its name matches.
    pub fn remove(&mut self, name: &str) -> bool {
        if self.current.as_ref().is_some_and(|held| held.name == name) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Attachment> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_returns_the_held_file_once() {
        let mut tracker = AttachmentTracker::new();
        tracker.select(Attachment::new("a.csv", "/tmp/a.csv"));

        assert_eq!(tracker.clear().map(|a| a.name), Some("a.csv".to_string()));
        assert!(tracker.is_empty());
        assert_eq!(tracker.clear(), None);
    }

    #[test]
    fn select_replaces_previous_file() {
        let mut tracker = AttachmentTracker::new();
        assert_eq!(tracker.select(Attachment::new("a.csv", "/tmp/a.csv")), None);
        let displaced = tracker.select(Attachment::new("b.csv", "/tmp/b.csv"));

        assert_eq!(displaced.map(|a| a.name), Some("a.csv".to_string()));
        assert_eq!(tracker.current().map(|a| a.name.as_str()), Some("b.csv"));
    }

    #[test]
    fn remove_requires_matching_name() {
        let mut tracker = AttachmentTracker::new();
        tracker.select(Attachment::new("a.csv", "/tmp/a.csv"));

        assert!(!tracker.remove("b.csv"));
        assert!(!tracker.is_empty());
        assert!(tracker.remove("a.csv"));
        assert!(tracker.is_empty());
        assert!(!tracker.remove("a.csv"));
    }

    #[test]
    fn from_path_uses_file_name() {
        let attachment = Attachment::from_path("/data/in/photo.png").unwrap();
        assert_eq!(attachment.name, "photo.png");
        assert!(Attachment::from_path("/").is_none());
    }
}
