//! In-memory host for driving the REPL loop in tests.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Test host with in-memory I/O buffers.
///
/// Input lines and signals are queued and consumed in order. Output is
/// buffered for later inspection.
#[derive(Debug, Default)]
pub struct TestHost {
    input_queue: VecDeque<String>,
    signal_queue: VecDeque<Signal>,
    output_buffer: Vec<Output>,
    last_prompt: Option<PromptConfig>,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.input_queue.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signal_queue.push_back(signal);
    }

    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// All output text, concatenated.
    pub fn output_text(&self) -> String {
        self.output_buffer
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.last_prompt.as_ref()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        // Inputs are queued up front; there is nothing to wait for.
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.input_queue.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.signal_queue.pop_front())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.last_prompt = Some(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_and_signals_come_back_in_order() {
        let mut host = TestHost::new();
        host.queue_inputs(["list", "next"]);
        host.queue_signal(Signal::Interrupt);
        host.queue_signal(Signal::Eof);

        assert_eq!(host.read_input().unwrap().unwrap().line, "list");
        assert_eq!(host.read_input().unwrap().unwrap().line, "next");
        assert!(host.read_input().unwrap().is_none());

        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Interrupt)));
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Eof)));
        assert!(host.read_signal().unwrap().is_none());
    }

    #[test]
    fn output_is_buffered_by_style() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("Slot 1\n")).unwrap();
        host.write_output(Output::error("Device disconnected.")).unwrap();
        host.write_output(Output::info("Goodbye!")).unwrap();

        assert_eq!(host.output().len(), 3);
        assert_eq!(host.errors(), vec!["Device disconnected."]);
        assert_eq!(host.output_with_style(OutputStyle::Info), vec!["Goodbye!"]);
        assert!(host.output_text().starts_with("Slot 1\n"));
    }

    #[test]
    fn prompt_and_flush_are_tracked() {
        let mut host = TestHost::new();
        host.write_prompt(PromptConfig {
            slot: 3,
            device: Some("memory".to_string()),
            pending: true,
        })
        .unwrap();
        host.flush().unwrap();
        host.flush().unwrap();

        let prompt = host.last_prompt().unwrap();
        assert_eq!(prompt.slot, 3);
        assert_eq!(prompt.device.as_deref(), Some("memory"));
        assert!(prompt.pending);
        assert_eq!(host.flush_count(), 2);
    }
}
