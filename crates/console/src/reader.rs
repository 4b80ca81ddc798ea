use std::{
    collections::VecDeque,
    fmt::Display,
    io::{BufRead, Write},
};

use tracing::debug;

use crate::error::{ConsoleError, ConsoleResult};

/// What to print when a token fails to parse, before asking again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    pub guidance: &'static str,
    pub prompt: &'static str,
}

/// Token-oriented console over one input source and one output sink.
///
/// Tokens are whitespace-delimited and may share a line, so `7 2` answers two
/// consecutive prompts. The input is held for the console's whole lifetime and
/// released when the console is dropped.
pub struct Console<R, W> {
    input: R,
    pending: VecDeque<String>,
    out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            out,
        }
    }

    /// Writes `text` without a newline and flushes so it shows before input.
    pub fn prompt(&mut self, text: &str) -> ConsoleResult<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    pub fn say(&mut self, line: impl Display) -> ConsoleResult<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Next whitespace-delimited token, verbatim.
    pub fn next_token(&mut self) -> ConsoleResult<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                return Err(ConsoleError::InputClosed);
            }
            let line = String::from_utf8_lossy(&raw);
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    /// Reads tokens until one parses as an `i32`. Each rejected token is
    /// discarded and answered with the guidance line and the retry prompt.
    pub fn read_int(&mut self, retry: Retry) -> ConsoleResult<i32> {
        loop {
            let token = self.next_token()?;
            match token.parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(error) => {
                    debug!(%token, %error, "discarding non-integer token");
                    self.say(retry.guidance)?;
                    self.prompt(retry.prompt)?;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[path = "tests/reader_tests.rs"]
mod tests;
