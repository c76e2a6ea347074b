//! Line-based console input
//!
//! Wraps any `BufRead` so the session can be driven from stdin or from a script.

use std::io::{self, BufRead};

/// Line that ends multi-line content entry
pub const END_OF_CONTENT: &str = ".";

/// Reads prompted lines from a buffered source
pub struct Prompter<R> {
    reader: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read one line without its line ending
    ///
    /// Returns `None` at end of input. Bytes that are not valid UTF-8 become
    /// U+FFFD so the caller can reject the line and prompt again.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&buf).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Read lines until a line holding only [`END_OF_CONTENT`] or end of input
    ///
    /// Returns `None` if input ended before any line was read.
    pub fn read_block(&mut self) -> io::Result<Option<String>> {
        let mut lines: Vec<String> = Vec::new();
        loop {
            match self.read_line()? {
                Some(line) if line == END_OF_CONTENT => break,
                Some(line) => lines.push(line),
                None if lines.is_empty() => return Ok(None),
                None => break,
            }
        }

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        Ok(Some(content))
    }
}
