//! Line reader that remembers physical line numbers.

use std::io::{self, BufRead, Lines};

pub(crate) struct NumberedLines<R> {
    inner: Lines<R>,
    line: usize,
}

impl<R: BufRead> NumberedLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line: 0,
        }
    }

    /// The next physical line, untouched.
    pub(crate) fn next_raw(&mut self) -> io::Result<Option<(usize, String)>> {
        let Some(text) = self.inner.next() else {
            return Ok(None);
        };
        self.line += 1;
        Ok(Some((self.line, text?)))
    }

    /// The next line that is neither a `%` comment nor blank, trimmed.
    pub(crate) fn next_content(&mut self) -> io::Result<Option<(usize, String)>> {
        while let Some((line, text)) = self.next_raw()? {
            if text.starts_with('%') {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some((line, trimmed.to_owned())));
            }
        }
        Ok(None)
    }
}
