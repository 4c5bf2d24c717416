//! Line-oriented input boundary for the interactive session.
//!
//! Every read consumes one whole line, so rejecting a line also discards
//! whatever followed the bad token. Blank lines are skipped without a
//! re-prompt. Bad input never ends a read; only end of input or an I/O
//! failure does.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

use roster_core::validate_text;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The input stream was closed
    #[error("end of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PromptError>;

/// A top-level menu selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    DisplayAll,
    Add,
    Search,
    Delete,
    SaveAndExit,
    /// A number with no menu entry
    Unknown(i64),
    /// Not a number at all
    Invalid,
}

impl MenuChoice {
    pub fn parse(line: &str) -> Self {
        match line.trim().parse::<i64>() {
            Ok(1) => MenuChoice::DisplayAll,
            Ok(2) => MenuChoice::Add,
            Ok(3) => MenuChoice::Search,
            Ok(4) => MenuChoice::Delete,
            Ok(5) => MenuChoice::SaveAndExit,
            Ok(n) => MenuChoice::Unknown(n),
            Err(_) => MenuChoice::Invalid,
        }
    }
}

/// Reads answers from `R` and writes prompts to `W`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write `text` without a newline and flush it.
    pub fn show(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    /// Next line with surrounding whitespace removed, skipping blank lines.
    fn next_line(&mut self) -> Result<String> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(PromptError::Eof);
            }
            let line = line.trim();
            if !line.is_empty() {
                return Ok(line.to_string());
            }
        }
    }

    /// Show `prompt`, then keep reading until a line parses as `T`,
    /// showing `retry` after each failure.
    fn read_parsed<T: FromStr>(&mut self, prompt: &str, retry: &str) -> Result<T> {
        self.show(prompt)?;
        loop {
            let line = self.next_line()?;
            match line.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    tracing::debug!(input = %line, "Rejected numeric input");
                    self.show(retry)?;
                }
            }
        }
    }

    pub fn read_int(&mut self, prompt: &str, retry: &str) -> Result<i32> {
        self.read_parsed(prompt, retry)
    }

    pub fn read_float(&mut self, prompt: &str, retry: &str) -> Result<f64> {
        self.read_parsed(prompt, retry)
    }

    /// Read a name-like text value, re-prompting while it is too long.
    pub fn read_text(&mut self, prompt: &str, field: &str, retry: &str) -> Result<String> {
        self.show(prompt)?;
        loop {
            let line = self.next_line()?;
            match validate_text(field, &line) {
                Ok(()) => return Ok(line),
                Err(e) => {
                    tracing::debug!(error = %e, "Rejected text input");
                    self.show(retry)?;
                }
            }
        }
    }

    pub fn read_choice(&mut self) -> Result<MenuChoice> {
        let line = self.next_line()?;
        Ok(MenuChoice::parse(&line))
    }
}
