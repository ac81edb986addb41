use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use taskboard_core::AppError;
use taskboard_core::dialogs::{Confirm, TextPrompt};
use tracing::warn;

/// Dialogs backed by the shell's own input stream.
///
/// Arguments given on the command line are queued up front so the command
/// does not ask for them again; anything not queued is read interactively.
/// A terminal line cannot be pre-filled, so a blank answer comes back blank
/// and the command decides what that means (a blank title cancels an add).
#[derive(Debug)]
pub struct TerminalDialogs<R> {
    input: R,
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    prompts_on_stderr: bool,
}

impl<R: BufRead> TerminalDialogs<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            answers: VecDeque::new(),
            confirmations: VecDeque::new(),
            prompts_on_stderr: false,
        }
    }

    /// Writes questions to stderr, keeping stdout for machine-readable output.
    pub fn prompts_on_stderr(mut self, enabled: bool) -> Self {
        self.prompts_on_stderr = enabled;
        self
    }

    /// Queue the answer for the next prompt. `None` means "ask the user".
    pub fn queue_answer(&mut self, answer: Option<String>) {
        self.answers.push_back(answer);
    }

    pub fn queue_confirmation(&mut self, confirmed: bool) {
        self.confirmations.push_back(confirmed);
    }

    /// Drop answers a command did not consume.
    pub fn clear_pending(&mut self) {
        self.answers.clear();
        self.confirmations.clear();
    }

    /// Next line without its line ending, or `None` at end of input.
    pub fn read_line(&mut self) -> Result<Option<String>, AppError> {
        let mut buffer = String::new();
        let read = self.input.read_line(&mut buffer)?;
        if read == 0 {
            return Ok(None);
        }

        let line = buffer.trim_end_matches(['\n', '\r']).to_string();
        Ok(Some(line))
    }

    fn ask(&mut self, question: &str) -> Option<String> {
        if self.prompts_on_stderr {
            eprint!("{question} ");
            let _ = io::stderr().flush();
        } else {
            print!("{question} ");
            let _ = io::stdout().flush();
        }

        match self.read_line() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to read answer");
                None
            }
        }
    }
}

impl<R: BufRead> TextPrompt for TerminalDialogs<R> {
    fn prompt_text(&mut self, message: &str, title: &str, _default: &str) -> Option<String> {
        if let Some(answer) = self.answers.pop_front()
            && let Some(value) = answer
        {
            return Some(value);
        }

        let line = self.ask(&format!("[{title}] {message}"))?;
        if line.trim().is_empty() {
            Some(String::new())
        } else {
            Some(line)
        }
    }
}

impl<R: BufRead> Confirm for TerminalDialogs<R> {
    fn confirm(&mut self, message: &str) -> bool {
        if let Some(confirmed) = self.confirmations.pop_front() {
            return confirmed;
        }

        let Some(line) = self.ask(&format!("{message} [y/N]")) else {
            return false;
        };
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
