//! Interactive prompts
//!
//! Prompts are human-paced and never time out. Cancelling a prompt (Esc or
//! Ctrl-C) counts as declining it.

use inquire::{Confirm, InquireError, Select, Text};

use crate::error::Result;

/// Seam for asking the user questions
pub trait Prompter {
    /// Yes/no question
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Pick one of `options`; `None` when the user backs out
    fn choose(&self, message: &str, options: &[&str]) -> Result<Option<usize>>;

    /// Free-form text; `None` when the user backs out or enters nothing
    fn input(&self, message: &str, placeholder: &str) -> Result<Option<String>>;
}

/// Prompts on the controlling terminal using inquire
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        match Confirm::new(message)
            .with_default(default)
            .with_help_message("Press Enter to accept the default, or y/n")
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn choose(&self, message: &str, options: &[&str]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }
        match Select::new(message, options.to_vec()).raw_prompt_skippable() {
            Ok(choice) => Ok(choice.map(|c| c.index)),
            Err(InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn input(&self, message: &str, placeholder: &str) -> Result<Option<String>> {
        match Text::new(message)
            .with_placeholder(placeholder)
            .prompt_skippable()
        {
            Ok(text) => Ok(text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())),
            Err(InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
