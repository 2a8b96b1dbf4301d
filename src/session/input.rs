//! Line input for the browse session
//!
//! `DialoguerReader` is used on an interactive terminal, `StdinReader` when
//! commands are piped in (`printf 'first 30\nq\n' | pagesel`).

use super::error::SessionError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::{self, BufRead, ErrorKind};

/// Source of session command lines
pub trait LineReader {
    /// Read the next line; `Ok(None)` means the input has ended
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the underlying input fails.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, SessionError>;
}

/// Interactive prompt on the terminal
pub struct DialoguerReader {
    theme: ColorfulTheme,
}

impl DialoguerReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for DialoguerReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        let result = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();

        match result {
            Ok(line) => Ok(Some(line)),
            Err(dialoguer::Error::IO(e))
                if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::Interrupted) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Plain line reader over any buffered input
pub struct StdinReader<R> {
    input: R,
}

impl StdinReader<io::StdinLock<'static>> {
    /// Reader over the process's standard input
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> StdinReader<R> {
    pub const fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> LineReader for StdinReader<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, SessionError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_stdin_reader_lines_then_eof() {
        let mut reader = StdinReader::new(Cursor::new("first 5\r\nq\n"));

        assert_eq!(reader.read_line("> ").unwrap(), Some("first 5".to_string()));
        assert_eq!(reader.read_line("> ").unwrap(), Some("q".to_string()));
        assert_eq!(reader.read_line("> ").unwrap(), None);
    }

    #[test]
    fn test_stdin_reader_keeps_empty_lines() {
        let mut reader = StdinReader::new(Cursor::new("\nn\n"));
        assert_eq!(reader.read_line("> ").unwrap(), Some(String::new()));
        assert_eq!(reader.read_line("> ").unwrap(), Some("n".to_string()));
    }
}
