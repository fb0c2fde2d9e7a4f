//! Per-file inclusion decisions.
//!
//! The assembler asks a [`Selector`] about every candidate. Batch runs use
//! [`AcceptAll`]; interactive runs use [`Prompt`], which keeps asking until it
//! gets a yes or a no.

use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Reject,
}

pub trait Selector {
    fn decide(&mut self, candidate: &Path) -> Result<Decision>;
}

/// Accepts every candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl Selector for AcceptAll {
    fn decide(&mut self, _candidate: &Path) -> Result<Decision> {
        Ok(Decision::Accept)
    }
}

/// Asks an actor on a line-based text interface.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, label: &str) -> Result<String> {
        write!(self.output, "Include '{label}' in the output? (y/n): ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read confirmation")?;
        if read == 0 {
            bail!("Input closed while waiting for confirmation of '{label}'");
        }

        Ok(line.trim().to_lowercase())
    }
}

impl Prompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Selector for Prompt<R, W> {
    fn decide(&mut self, candidate: &Path) -> Result<Decision> {
        let label = candidate.display().to_string();
        loop {
            match self.ask(&label)?.as_str() {
                "y" | "yes" => return Ok(Decision::Accept),
                "n" | "no" => return Ok(Decision::Reject),
                _ => writeln!(
                    self.output,
                    "Invalid input. Please enter 'y' for yes or 'n' for no."
                )?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> Prompt<Cursor<Vec<u8>>, Vec<u8>> {
        Prompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn accept_all_accepts() -> anyhow::Result<()> {
        assert_eq!(AcceptAll.decide(Path::new("a.py"))?, Decision::Accept);
        Ok(())
    }

    #[test]
    fn answers_are_case_insensitive() -> anyhow::Result<()> {
        let mut p = prompt("YES\nNo\n y \nN\n");
        assert_eq!(p.decide(Path::new("a"))?, Decision::Accept);
        assert_eq!(p.decide(Path::new("b"))?, Decision::Reject);
        assert_eq!(p.decide(Path::new("c"))?, Decision::Accept);
        assert_eq!(p.decide(Path::new("d"))?, Decision::Reject);
        Ok(())
    }

    #[test]
    fn reprompts_on_invalid_input() -> anyhow::Result<()> {
        let mut p = prompt("maybe\n\nyep\nn\n");
        assert_eq!(p.decide(Path::new("notes.txt"))?, Decision::Reject);

        let shown = String::from_utf8(p.output)?;
        assert_eq!(shown.matches("Include 'notes.txt' in the output?").count(), 4);
        assert_eq!(shown.matches("Invalid input.").count(), 3);
        Ok(())
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = prompt("what\n");
        assert!(p.decide(Path::new("a.py")).is_err());
    }
}
