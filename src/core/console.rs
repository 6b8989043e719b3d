//! Operator console: line-oriented prompts over any reader/writer pair.
//!
//! Production wires stdin/stdout; tests feed canned input through a `Cursor`.

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line of operator-facing text.
    pub fn line(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).map_err(write_error)
    }

    /// Show `message` and read one line. Returns `None` once input is closed.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message).map_err(write_error)?;
        self.output.flush().map_err(write_error)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;

        if read == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn write_error(e: io::Error) -> Error {
    Error::internal_io(e.to_string(), Some("write stdout".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_trims_input() {
        let mut console = Console::new(Cursor::new("  2 \n"), Vec::new());
        assert_eq!(console.prompt("> ").unwrap(), Some("2".to_string()));
        assert_eq!(String::from_utf8(console.into_output()).unwrap(), "> ");
    }

    #[test]
    fn prompt_returns_none_on_eof() {
        let mut console = Console::new(Cursor::new(""), Vec::new());
        assert_eq!(console.prompt("> ").unwrap(), None);
    }

    #[test]
    fn empty_line_is_not_eof() {
        let mut console = Console::new(Cursor::new("\n"), Vec::new());
        assert_eq!(console.prompt("> ").unwrap(), Some(String::new()));
    }
}
