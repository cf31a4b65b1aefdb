use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

/// Syntax highlighter for the REPL
pub struct ReplHighlighter {
    commands: Vec<&'static str>,
}

impl ReplHighlighter {
    pub fn new() -> Self {
        Self {
            commands: vec![
                "help",
                "?",
                "exit",
                "quit",
                "q",
                "list",
                "ls",
                "show",
                "select",
                "sel",
                "next",
                "n",
                "prev",
                "p",
                "set",
                "dump",
                "load",
                "apply",
                "discard",
                "connect",
                "disconnect",
                "status",
            ],
        }
    }
}

impl Default for ReplHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for ReplHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let (command, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };

        let cmd_lower = command.to_lowercase();
        let cmd_style = if self.commands.contains(&cmd_lower.as_str()) {
            Style::new().bold().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::Red)
        };
        styled.push((cmd_style, command.to_string()));

        if rest.is_empty() {
            return styled;
        }

        match cmd_lower.as_str() {
            // Field name in yellow, value in green.
            "set" => {
                let trimmed = rest.trim_start();
                let lead = &rest[..rest.len() - trimmed.len()];
                match trimmed.find(char::is_whitespace) {
                    Some(end) => {
                        styled.push((
                            Style::new().fg(Color::Yellow),
                            format!("{}{}", lead, &trimmed[..end]),
                        ));
                        styled.push((Style::new().fg(Color::Green), trimmed[end..].to_string()));
                    }
                    None => styled.push((Style::new().fg(Color::Yellow), rest.to_string())),
                }
            }
            "dump" | "load" | "connect" => {
                styled.push((Style::new().fg(Color::Yellow), rest.to_string()));
            }
            _ => {
                styled.push((Style::new(), rest.to_string()));
            }
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_empty_returns_empty() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("", 0);
        assert!(styled.buffer.is_empty());
    }

    #[test]
    fn highlight_recognized_command_only() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("list", 0);
        assert_eq!(styled.buffer.len(), 1);
        assert_eq!(styled.buffer[0].1, "list");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert!(styled.buffer[0].0.is_bold);
    }

    #[test]
    fn highlight_unknown_command() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("read /x", 0);
        assert_eq!(styled.buffer[0].1, "read");
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Red));
    }

    #[test]
    fn highlight_set_field_and_value() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("set center.x 12.5", 0);
        assert_eq!(styled.buffer.len(), 3);
        assert_eq!(styled.buffer[1].1, " center.x");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
        assert_eq!(styled.buffer[2].1, " 12.5");
        assert_eq!(styled.buffer[2].0.foreground, Some(Color::Green));
    }

    #[test]
    fn highlight_set_field_only() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("set form", 0);
        assert_eq!(styled.buffer.len(), 2);
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_path_arguments() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("load /tmp/25.json", 0);
        assert_eq!(styled.buffer[1].1, " /tmp/25.json");
        assert_eq!(styled.buffer[1].0.foreground, Some(Color::Yellow));
    }

    #[test]
    fn highlight_case_insensitive() {
        let highlighter = ReplHighlighter::new();
        let styled = highlighter.highlight("SHOW 3", 0);
        assert_eq!(styled.buffer[0].0.foreground, Some(Color::Cyan));
        assert_eq!(styled.buffer[1].0.foreground, None);
    }
}
