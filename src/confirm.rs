//! Confirmation capability used before destructive changes.
//!
//! The reconciliation engine never reads stdin itself; it asks a [`Confirm`]
//! implementation. The CLI uses [`PromptConfirm`] on the terminal (or
//! [`AutoConfirm`] with `--yes`), tests supply fixed answers.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

pub trait Confirm {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Answers every question with the same fixed value.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Asks on a line-oriented reader/writer pair, `(y/N)` style.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process terminal.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{} (y/N): ", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut answer = String::new();
        self.input
            .read_line(&mut answer)
            .context("Failed to read confirmation")?;

        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
