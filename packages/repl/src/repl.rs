//! Platform-independent REPL core.
//!
//! This module contains the main REPL loop logic.

use crate::commands::{self, CommandResult};
use crate::config::EditMode;
use crate::context::EditorContext;
use crate::host::TerminalHost;
use crate::io::{ExitReason, IoError, IoHost, Output, PromptConfig, Signal};

/// The platform-independent REPL core.
pub struct ReplCore {
    ctx: EditorContext,
}

impl ReplCore {
    pub fn new(ctx: EditorContext) -> Self {
        Self { ctx }
    }

    /// Run the REPL loop, reading/writing through the provided I/O host.
    pub fn run(&mut self, io: &mut impl IoHost) -> Result<ExitReason, IoError> {
        self.write_banner(io)?;

        loop {
            self.update_prompt(io)?;
            io.wait_for_input()?;

            if let Some(signal) = io.read_signal()? {
                match signal {
                    Signal::Eof => {
                        io.write_output(Output::info("Goodbye!"))?;
                        io.flush()?;
                        return Ok(ExitReason::Eof);
                    }
                    Signal::Interrupt => {
                        io.write_output(Output::info("^C (use 'exit' to quit)"))?;
                        continue;
                    }
                }
            }

            let input = match io.read_input()? {
                Some(input) => input,
                None => continue,
            };

            match commands::execute(&input.line, &mut self.ctx) {
                CommandResult::Ok { display: None } => {}
                CommandResult::Ok {
                    display: Some(output),
                } => {
                    io.write_output(Output::normal(output))?;
                }
                CommandResult::Error(msg) => {
                    tracing::debug!(command = %input.line, error = %msg, "command failed");
                    io.write_output(Output::error(msg))?;
                }
                CommandResult::Help => {
                    io.write_output(Output::normal(commands::format_help()))?;
                }
                CommandResult::Exit => {
                    io.write_output(Output::info("Goodbye!"))?;
                    io.flush()?;
                    return Ok(ExitReason::UserExit);
                }
            }

            io.flush()?;
        }
    }

    pub fn context(&self) -> &EditorContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.ctx
    }

    fn write_banner(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.write_output(Output::banner(BANNER))
    }

    fn update_prompt(&self, io: &mut impl IoHost) -> Result<(), IoError> {
        io.write_prompt(PromptConfig {
            slot: self.ctx.selected().get(),
            device: self.ctx.session().label().map(str::to_string),
            pending: self.ctx.pending().is_some(),
        })
    }
}

/// Run the editor on the terminal.
pub fn run(ctx: EditorContext, edit_mode: Option<EditMode>) -> Result<ExitReason, IoError> {
    let mut host = TerminalHost::new(edit_mode).map_err(|e| IoError::Io(e.to_string()))?;
    ReplCore::new(ctx).run(&mut host)
}

const BANNER: &str = r#"
  ___        _   _                    _
 / _ \ _   _| |_| |__  _ __ ___  __ _| | __
| | | | | | | __| '_ \| '__/ _ \/ _` | |/ /
| |_| | |_| | |_| |_) | | |  __/ (_| |   <
 \___/ \__,_|\__|_.__/|_|  \___|\__,_|_|\_\

Type 'help' for available commands, 'exit' to quit.
"#;
