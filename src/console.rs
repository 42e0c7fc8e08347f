//! The console the machine talks to when it executes `Pause` and `Print`.

use crate::tape::Tape;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Prompt shown before waiting on a `Pause`.
pub const PAUSE_PROMPT: &str = "press enter to continue: ";

/// Line-oriented input and output used by the interpreter for its side effects.
pub struct Console<R, W> {
    input: R,
    output: W,
    prompt: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            prompt: true,
        }
    }

    /// Enables or disables the pause prompt.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Blocks until one line (or end of input) is read.
    pub fn pause(&mut self) -> io::Result<()> {
        if self.prompt {
            write!(self.output, "{PAUSE_PROMPT}")?;
            self.output.flush()?;
        }

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }

    /// Writes the tape followed by the head marker.
    pub fn show(&mut self, tape: &Tape) -> io::Result<()> {
        writeln!(self.output, "{tape}")?;
        self.output.flush()
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl Console<StdinLock<'static>, Stdout> {
    /// A console bound to the process stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}
