//! The seam between the editor loop and the terminal.
//!
//! `ReplCore` only talks to an [`IoHost`]. The terminal host renders through
//! reedline; the test host replays queued lines and records what was printed.

pub mod types;

#[cfg(test)]
pub mod test_host;

pub use types::*;

#[cfg(test)]
pub use test_host::TestHost;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(String),
}

/// Line-oriented terminal access for the editor loop.
///
/// Each turn the loop sets the prompt, calls `wait_for_input`, then drains
/// at most one signal or one line.
pub trait IoHost {
    /// Block until the user submits a line or presses a control key.
    fn wait_for_input(&mut self) -> Result<(), IoError>;

    /// The line captured by the last wait, if any.
    fn read_input(&mut self) -> Result<Option<InputLine>, IoError>;

    /// The control key captured by the last wait, if any.
    fn read_signal(&mut self) -> Result<Option<Signal>, IoError>;

    fn write_output(&mut self, output: Output) -> Result<(), IoError>;

    /// Replace the prompt shown on the next wait.
    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError>;

    fn flush(&mut self) -> Result<(), IoError> {
        Ok(())
    }
}
