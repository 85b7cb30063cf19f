/// Joins "artifact URL known" with "embedded preview finished loading".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewGate {
    artifact_url: Option<String>,
    loaded: bool,
}

impl PreviewGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the artifact URL once; later calls are ignored and return false.
    pub fn set_artifact_url(&mut self, url: impl Into<String>) -> bool {
        if self.artifact_url.is_some() {
            return false;
        }
        self.artifact_url = Some(url.into());
        self.loaded = false;
        true
    }

    /// Records the preview's load signal. Returns true only for the first
    /// effective call; before a URL exists there is nothing to load.
    pub fn mark_loaded(&mut self) -> bool {
        if self.artifact_url.is_none() || self.loaded {
            return false;
        }
        self.loaded = true;
        true
    }

    pub fn reset(&mut self) {
        self.artifact_url = None;
        self.loaded = false;
    }

    pub fn is_overlay_visible(&self) -> bool {
        self.artifact_url.is_none() || !self.loaded
    }

    /// The embedded content may only exist once there is a URL to point it at.
    pub fn should_render_content(&self) -> bool {
        self.artifact_url.is_some()
    }

    pub fn artifact_url(&self) -> Option<&str> {
        self.artifact_url.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::PreviewGate;

    #[test]
    fn overlay_hides_only_after_url_and_load() {
        let mut gate = PreviewGate::new();
        assert!(gate.is_overlay_visible());
        assert!(!gate.should_render_content());

        assert!(gate.set_artifact_url("https://x/preview.html"));
        assert!(gate.is_overlay_visible());
        assert!(gate.should_render_content());

        assert!(gate.mark_loaded());
        assert!(!gate.is_overlay_visible());
    }

    #[test]
    fn load_before_url_has_no_effect() {
        let mut gate = PreviewGate::new();
        assert!(!gate.mark_loaded());

        gate.set_artifact_url("https://x/preview.html");
        assert!(gate.is_overlay_visible());
        assert!(!gate.is_loaded());
    }

    #[test]
    fn repeated_calls_are_noops() {
        let mut gate = PreviewGate::new();
        gate.set_artifact_url("https://x/a.html");
        assert!(!gate.set_artifact_url("https://x/b.html"));
        assert_eq!(gate.artifact_url(), Some("https://x/a.html"));

        assert!(gate.mark_loaded());
        assert!(!gate.mark_loaded());
        assert!(!gate.is_overlay_visible());
    }

    #[test]
    fn reset_clears_both_fields() {
        let mut gate = PreviewGate::new();
        gate.set_artifact_url("https://x/a.html");
        gate.mark_loaded();
        gate.reset();

        assert_eq!(gate, PreviewGate::default());
    }
}
