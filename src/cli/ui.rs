//! Shared UI primitives for contactbook
//!
//! Conventions:
//! - Prompts: a full sentence, inquire adds the cursor
//! - Cancelling: `stop`, `break`, `-`, Esc or Ctrl+C all give [`Answer::Cancelled`]
//! - Feedback: the rendered [`Response`](crate::book::Response), nothing else

use anyhow::Result;
use crossterm::{
    cursor,
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Text};
use std::io::{self, Write};

/// Typed at any prompt to abandon the current command.
pub const CANCEL_WORDS: [&str; 3] = ["stop", "break", "-"];

pub const CANCEL_HINT: &str = "To stop the execution enter one of these commands (stop, break, -)";

/// What the user typed, or that they backed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Cancelled,
}

impl Answer {
    /// Trim the raw input and recognize the cancel words.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if is_cancel_word(trimmed) {
            Answer::Cancelled
        } else {
            Answer::Text(trimmed.to_string())
        }
    }
}

pub fn is_cancel_word(input: &str) -> bool {
    let lowered = input.trim().to_lowercase();
    CANCEL_WORDS.contains(&lowered.as_str())
}

/// Everything the session needs from a terminal.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<Answer>;

    /// Yes/no, defaulting to no. Cancelling counts as no.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    fn say(&mut self, text: &str);
}

/// [`Prompter`] backed by inquire on the real terminal.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, prompt: &str) -> Result<Answer> {
        let result = Text::new(prompt)
            .with_render_config(minimal_render_config())
            .prompt();
        match result {
            Ok(input) => Ok(Answer::from_input(&input)),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok(Answer::Cancelled)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let result = Confirm::new(prompt)
            .with_render_config(minimal_render_config())
            .with_default(false)
            .prompt();
        match result {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_render_config_drops_prefixes() {
        let config = minimal_render_config();
        assert_eq!(config.prompt_prefix.content, "");
        assert_eq!(config.answered_prompt_prefix.content, "");
    }

    #[test]
    fn test_cancel_words() {
        for word in ["stop", "break", "-", " STOP ", "Break"] {
            assert!(is_cancel_word(word), "{word:?} should cancel");
        }
        assert!(!is_cancel_word("stopwatch"));
        assert!(!is_cancel_word(""));
    }

    #[test]
    fn test_answer_from_input() {
        assert_eq!(Answer::from_input("  Alice "), Answer::Text("Alice".into()));
        assert_eq!(Answer::from_input("-"), Answer::Cancelled);
        assert_eq!(Answer::from_input(""), Answer::Text(String::new()));
    }
}
