use suite_core::{Attachment, Msg};

pub(crate) const HELP: &str = "\
Type a request and press Enter to submit it.
  /attach <path>   attach a file (replaces any attached file)
  /remove <name>   remove the attached file
  /reset, /home    clear everything and start over
  /help            show this help
  /quit            exit
An empty line submits the attached file on its own.";

/// What one line of terminal input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UserCommand {
    Dispatch(Vec<Msg>),
    Help,
    Invalid(String),
    Quit,
}

pub(crate) fn parse_line(line: &str) -> UserCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();

    let Some(command) = trimmed.strip_prefix('/') else {
        if trimmed.is_empty() {
            return UserCommand::Dispatch(vec![
                Msg::InputChanged(String::new()),
                Msg::SubmitClicked,
            ]);
        }
        return UserCommand::Dispatch(vec![
            Msg::InputChanged(line.to_string()),
            Msg::SubmitClicked,
        ]);
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "attach" => match Attachment::from_path(argument) {
            Some(attachment) if !argument.is_empty() => {
                UserCommand::Dispatch(vec![Msg::FileSelected(attachment)])
            }
            _ => UserCommand::Invalid("usage: /attach <path>".to_string()),
        },
        "remove" if !argument.is_empty() => UserCommand::Dispatch(vec![Msg::FileRemoved {
            name: argument.to_string(),
        }]),
        "remove" => UserCommand::Invalid("usage: /remove <name>".to_string()),
        "reset" | "home" => UserCommand::Dispatch(vec![Msg::ResetClicked]),
        "help" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => UserCommand::Invalid(format!("unknown command /{other}, try /help")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_core::{update, AppState, Effect, GenerationRequest};

    #[test]
    fn plain_text_edits_then_submits() {
        assert_eq!(
            parse_line("build a chart\n"),
            UserCommand::Dispatch(vec![
                Msg::InputChanged("build a chart".to_string()),
                Msg::SubmitClicked,
            ])
        );
    }

    fn apply(state: AppState, line: &str) -> (AppState, Vec<Effect>) {
        let UserCommand::Dispatch(msgs) = parse_line(line) else {
            panic!("expected {line:?} to dispatch");
        };
        let mut effects = Vec::new();
        let state = msgs.into_iter().fold(state, |state, msg| {
            let (state, mut produced) = update(state, msg);
            effects.append(&mut produced);
            state
        });
        (state, effects)
    }

    fn sent_request(effects: &[Effect]) -> Option<&GenerationRequest> {
        effects.iter().find_map(|effect| match effect {
            Effect::SendGeneration { request, .. } => Some(request),
            _ => None,
        })
    }

    #[test]
    fn empty_line_clears_text_then_submits() {
        assert_eq!(
            parse_line("   "),
            UserCommand::Dispatch(vec![Msg::InputChanged(String::new()), Msg::SubmitClicked])
        );
    }

    #[test]
    fn empty_line_sends_attachment_without_previous_text() {
        let (state, effects) = apply(AppState::new(), "build a chart");
        assert_eq!(
            sent_request(&effects).map(|request| request.text.as_str()),
            Some("build a chart")
        );

        let (state, _) = apply(state, "/attach /tmp/data.csv");
        let (_, effects) = apply(state, "");
        assert_eq!(
            sent_request(&effects),
            Some(&GenerationRequest {
                text: String::new(),
                attachment: Some(Attachment::new("data.csv", "/tmp/data.csv")),
            })
        );
    }

    #[test]
    fn empty_line_without_attachment_is_rejected() {
        let (state, _) = apply(AppState::new(), "/attach /tmp/data.csv");
        let (state, _) = apply(state, "/remove data.csv");
        let (state, effects) = apply(state, "");

        assert!(effects.is_empty());
        assert_eq!(state.live_submission(), None);
    }

    #[test]
    fn attach_uses_file_name_for_display() {
        assert_eq!(
            parse_line("/attach /tmp/in/data.csv"),
            UserCommand::Dispatch(vec![Msg::FileSelected(Attachment::new(
                "data.csv",
                "/tmp/in/data.csv"
            ))])
        );
        assert!(matches!(parse_line("/attach"), UserCommand::Invalid(_)));
    }

    #[test]
    fn remove_and_reset_map_to_actions() {
        assert_eq!(
            parse_line("/remove data.csv"),
            UserCommand::Dispatch(vec![Msg::FileRemoved {
                name: "data.csv".to_string()
            }])
        );
        assert_eq!(
            parse_line("/home"),
            UserCommand::Dispatch(vec![Msg::ResetClicked])
        );
        assert!(matches!(parse_line("/remove"), UserCommand::Invalid(_)));
    }

    #[test]
    fn unknown_commands_are_invalid() {
        assert_eq!(parse_line("/quit"), UserCommand::Quit);
        assert_eq!(parse_line("/help"), UserCommand::Help);
        assert!(matches!(parse_line("/frobnicate"), UserCommand::Invalid(_)));
    }
}
