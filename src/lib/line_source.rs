//! Line-at-a-time reading with one line of lookahead.
//!
//! [`LineSource`] wraps any [`BufRead`] and hands out lines as owned byte vectors with the
//! trailing `\n` removed. A trailing `\r` is kept as-is. Clean end of input is reported as
//! [`SplitError::EndOfInput`], which callers treat as a signal rather than a failure; any other
//! read error is [`SplitError::InputFailure`].
//!
//! # Example
//!
//! ```
//! use vcfsplit_lib::line_source::LineSource;
//!
//! let mut source = LineSource::new(&b"#header\nchr1\t10\n"[..]);
//! assert_eq!(source.peek().unwrap(), b"#header");
//! source.drop_line();
//! assert_eq!(source.take().unwrap(), b"chr1\t10".to_vec());
//! assert!(source.take().unwrap_err().is_end_of_input());
//! ```

use std::io::BufRead;

use crate::errors::{Result, SplitError};

/// Streams lines from a reader, caching at most one line that has been peeked.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    /// The cached line, if one has been read but not yet dropped or taken.
    next: Option<Vec<u8>>,
    /// Length of the most recently read line, used to size the next buffer.
    last_len: usize,
    /// Number of lines read from the underlying reader.
    lines_read: u64,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self { reader, next: None, last_len: 0, lines_read: 0 }
    }

    /// Return the current line, reading one from the underlying reader if none is cached.
    ///
    /// # Errors
    ///
    /// [`SplitError::EndOfInput`] at a clean end of input, [`SplitError::InputFailure`] on any
    /// other I/O error.
    pub fn peek(&mut self) -> Result<&[u8]> {
        if self.next.is_none() {
            let line = self.read_line()?;
            self.next = Some(line);
        }
        Ok(self.next.as_deref().unwrap_or_default())
    }

    /// Discard the cached line, if any.
    pub fn drop_line(&mut self) {
        self.next = None;
    }

    /// Move out the current line, reading one if none is cached.
    ///
    /// Equivalent to [`peek`](Self::peek) followed by [`drop_line`](Self::drop_line) without
    /// copying the line.
    ///
    /// # Errors
    ///
    /// Same as [`peek`](Self::peek).
    pub fn take(&mut self) -> Result<Vec<u8>> {
        match self.next.take() {
            Some(line) => Ok(line),
            None => self.read_line(),
        }
    }

    /// Number of lines read from the underlying reader so far.
    #[must_use]
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    fn read_line(&mut self) -> Result<Vec<u8>> {
        // Lines in a VCF tend to have similar lengths, so start near the previous size.
        let mut line = Vec::with_capacity(self.last_len + self.last_len / 4);
        let n = self.reader.read_until(b'\n', &mut line).map_err(SplitError::InputFailure)?;
        if n == 0 {
            return Err(SplitError::EndOfInput);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        self.last_len = line.len();
        self.lines_read += 1;
        Ok(line)
    }
}
