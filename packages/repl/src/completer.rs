use outbreak_core::{Axis, FieldKind, PointKind};
use reedline::{Completer, Span, Suggestion};

/// Command completer for the REPL
pub struct ReplCompleter {
    commands: Vec<&'static str>,
    fields: Vec<String>,
}

impl ReplCompleter {
    pub fn new() -> Self {
        let mut fields: Vec<String> = FieldKind::ALL
            .iter()
            .filter(|kind| !kind.is_position())
            .map(|kind| kind.name().to_string())
            .collect();
        for point in [PointKind::Center, PointKind::Dummy] {
            for axis in Axis::ALL {
                fields.push(format!("{}.{}", point.name(), axis.name()));
            }
        }

        Self {
            commands: vec![
                "help",
                "exit",
                "quit",
                "list",
                "show",
                "select",
                "next",
                "prev",
                "set",
                "dump",
                "load",
                "apply",
                "discard",
                "connect",
                "disconnect",
                "status",
            ],
            fields,
        }
    }
}

impl Default for ReplCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ReplCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();
        let typing_word = !line_to_pos.ends_with(' ');

        let (candidates, prefix): (Vec<(&str, String)>, &str) = match words.as_slice() {
            [] => (self.command_candidates(), ""),
            [word] if typing_word => (self.command_candidates(), *word),
            [cmd] if cmd.eq_ignore_ascii_case("set") => (self.field_candidates(), ""),
            [cmd, word] if typing_word && cmd.eq_ignore_ascii_case("set") => {
                (self.field_candidates(), *word)
            }
            _ => return Vec::new(),
        };

        let start = pos - prefix.len();
        candidates
            .into_iter()
            .filter(|(value, _)| value.starts_with(prefix))
            .map(|(value, description)| Suggestion {
                value: value.to_string(),
                description: Some(description),
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: true,
                match_indices: None,
            })
            .collect()
    }
}

impl ReplCompleter {
    fn command_candidates(&self) -> Vec<(&str, String)> {
        self.commands
            .iter()
            .map(|cmd| (*cmd, command_description(cmd).to_string()))
            .collect()
    }

    fn field_candidates(&self) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .map(|field| (field.as_str(), "Field".to_string()))
            .collect()
    }
}

fn command_description(cmd: &str) -> &'static str {
    match cmd {
        "help" => "Show help",
        "exit" | "quit" => "Exit the editor",
        "list" => "List all slots",
        "show" => "Show a slot",
        "select" => "Select a slot",
        "next" => "Select the next slot",
        "prev" => "Select the previous slot",
        "set" => "Edit a field of the selected slot",
        "dump" => "Write the selected slot to a file",
        "load" => "Stage a snapshot file as a draft",
        "apply" => "Commit the pending draft",
        "discard" => "Drop the pending draft",
        "connect" => "Connect to a device",
        "disconnect" => "Drop the device session",
        "status" => "Show session status",
        _ => "",
    }
}
