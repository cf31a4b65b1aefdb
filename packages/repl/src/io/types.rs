//! Values exchanged between the editor loop and its host.

/// One line typed at the prompt.
#[derive(Debug, Clone)]
pub struct InputLine {
    pub line: String,
}

/// Control keys the host reports instead of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Ctrl+C
    Interrupt,
    /// Ctrl+D
    Eof,
}

/// Text for the host to print, with a rendering hint.
#[derive(Debug, Clone)]
pub struct Output {
    pub text: String,
    pub style: OutputStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// Printed as is. Record tables carry their own colours.
    #[default]
    Normal,
    /// Failed commands, including refused device writes.
    Error,
    Info,
    Banner,
}

impl Output {
    fn styled(text: impl Into<String>, style: OutputStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Normal)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Error)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Info)
    }

    pub fn banner(text: impl Into<String>) -> Self {
        Self::styled(text, OutputStyle::Banner)
    }
}

/// What the prompt shows before the next line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptConfig {
    /// Selected slot number.
    pub slot: u8,
    /// What the session is connected to, if anything.
    pub device: Option<String>,
    /// Whether a draft is waiting for `apply` or `discard`.
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// `exit` or `quit`
    UserExit,
    /// Ctrl+D
    Eof,
}
