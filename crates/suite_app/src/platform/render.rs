use suite_core::{AppViewModel, SubmissionId, SubmissionStatus};

/// Turns successive view models into terminal lines, printing only what changed.
///
/// Log lines are written once each, so the newest entry is always the last
/// thing on screen.
#[derive(Debug, Default)]
pub(crate) struct TerminalRenderer {
    submission: Option<SubmissionId>,
    lines_shown: usize,
    status: SubmissionStatus,
    attachment: Option<String>,
    preview: PreviewShown,
    failure: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum PreviewShown {
    #[default]
    Nothing,
    Loading,
    Ready,
}

impl TerminalRenderer {
    pub(crate) fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut out = Vec::new();

        if view.attachment_name != self.attachment {
            match &view.attachment_name {
                Some(name) => out.push(format!("📎 attached: {name}")),
                None if self.submission.is_some() || self.attachment.is_some() => {
                    out.push("📎 no attachment".to_string())
                }
                None => {}
            }
            self.attachment = view.attachment_name.clone();
        }

        if view.submission != self.submission {
            match view.submission {
                Some(id) => out.push(format!("── submission #{id} ──")),
                None => out.push("── home ──".to_string()),
            }
            self.submission = view.submission;
            self.lines_shown = 0;
            self.preview = PreviewShown::Nothing;
            self.failure = None;
        }

        if view.status != self.status {
            if view.status != SubmissionStatus::Idle {
                out.push(format!("status: {}", status_label(view.status)));
            }
            self.status = view.status;
        }

        for line in view.log_lines.iter().skip(self.lines_shown) {
            out.push(format!(
                "[{}] #{:<3} {}",
                line.received_at, line.sequence_index, line.text
            ));
        }
        self.lines_shown = view.log_lines.len();

        let preview = match (&view.artifact_url, view.overlay_visible) {
            (Some(_), false) => PreviewShown::Ready,
            (Some(_), true) if view.show_preview => PreviewShown::Loading,
            _ => PreviewShown::Nothing,
        };
        if preview != self.preview {
            if let Some(url) = &view.artifact_url {
                match preview {
                    PreviewShown::Loading => out.push(format!("preview: loading {url} …")),
                    PreviewShown::Ready => out.push(format!("preview ready: {url}")),
                    PreviewShown::Nothing => {}
                }
            }
            self.preview = preview;
        }

        if view.failure != self.failure {
            if let Some(reason) = &view.failure {
                out.push(format!(
                    "generation failed: {reason} (submit again or /reset)"
                ));
            }
            self.failure = view.failure.clone();
        }

        out
    }
}

fn status_label(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Idle => "Idle",
        SubmissionStatus::Submitting => "Submitting",
        SubmissionStatus::Streaming => "Streaming",
        SubmissionStatus::Finished => "Finished",
        SubmissionStatus::Failed => "Failed",
    }
}
