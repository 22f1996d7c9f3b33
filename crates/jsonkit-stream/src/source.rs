//! Buffered character source with position tracking.

use std::fmt;
use std::io::{self, Read};

use crate::error::ParseError;

pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Position of the next unread character.
///
/// `line` and `column` are 1-based; `offset` counts consumed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: u64,
    pub column: u64,
    pub offset: u64,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}, offset {}",
            self.line, self.column, self.offset
        )
    }
}

/// Decodes UTF-8 characters from a reader through a fixed-size byte buffer.
///
/// The buffer is refilled only once it is exhausted. One decoded character of
/// lookahead is cached; consumed characters are never pushed back.
pub struct CharSource<R> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    eof: bool,
    peeked: Option<char>,
    location: Location,
}

impl<R: Read> CharSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_buffer_size(reader, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(reader: R, size: usize) -> Self {
        CharSource {
            reader,
            buf: vec![0; size.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            eof: false,
            peeked: None,
            location: Location::default(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Returns the reader. Buffered but unconsumed input is lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Next character without consuming it; `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<char>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }

    /// Consumes the next character.
    pub fn read_char(&mut self) -> Result<char, ParseError> {
        match self.peek()? {
            Some(c) => {
                self.consume(c);
                Ok(c)
            }
            None => Err(ParseError::UnexpectedEof {
                location: self.location,
            }),
        }
    }

    /// Consumes exactly `n` characters.
    pub fn read_exact(&mut self, n: usize) -> Result<String, ParseError> {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_char()?);
        }
        Ok(out)
    }

    /// Skips JSON whitespace: space, tab, carriage return and line feed.
    pub fn skip_whitespace(&mut self) -> Result<(), ParseError> {
        while let Some(c @ (' ' | '\t' | '\r' | '\n')) = self.peek()? {
            self.consume(c);
        }
        Ok(())
    }

    /// Consumes the peeked character, if any.
    pub(crate) fn bump(&mut self) {
        if let Some(c) = self.peeked {
            self.consume(c);
        }
    }

    fn consume(&mut self, c: char) {
        self.peeked = None;
        self.location.offset += 1;
        if c == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
    }

    fn decode(&mut self) -> Result<Option<char>, ParseError> {
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(char::from(first))),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(self.invalid_utf8()),
        };
        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(b) => *slot = b,
                None => return Err(self.invalid_utf8()),
            }
        }
        match std::str::from_utf8(&bytes[..width]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Err(self.invalid_utf8()),
        }
    }

    fn invalid_utf8(&self) -> ParseError {
        ParseError::syntax("invalid UTF-8", self.location)
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        if self.pos == self.len {
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
            if self.len == 0 {
                return Ok(None);
            }
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        Ok(Some(b))
    }

    fn fill(&mut self) -> Result<(), ParseError> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    self.eof = n == 0;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ParseError::Io(e)),
            }
        }
    }
}

impl<R> fmt::Debug for CharSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharSource")
            .field("buffer_size", &self.buf.len())
            .field("location", &self.location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out at most `chunk` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn tracks_line_column_offset() {
        let mut src = CharSource::new("ab\ncd".as_bytes());
        assert_eq!(src.location(), Location { line: 1, column: 1, offset: 0 });
        assert_eq!(src.read_char().unwrap(), 'a');
        assert_eq!(src.read_char().unwrap(), 'b');
        assert_eq!(src.location(), Location { line: 1, column: 3, offset: 2 });
        assert_eq!(src.read_char().unwrap(), '\n');
        assert_eq!(src.location(), Location { line: 2, column: 1, offset: 3 });
        assert_eq!(src.read_exact(2).unwrap(), "cd");
        assert_eq!(src.location(), Location { line: 2, column: 3, offset: 5 });
    }

    #[test]
    fn peek_does_not_consume() {
        let mut src = CharSource::new("x".as_bytes());
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.peek().unwrap(), Some('x'));
        assert_eq!(src.location().offset, 0);
        assert_eq!(src.read_char().unwrap(), 'x');
        assert_eq!(src.peek().unwrap(), None);
    }

    #[test]
    fn eof_errors() {
        let mut src = CharSource::new("ab".as_bytes());
        assert!(matches!(
            src.read_exact(3),
            Err(ParseError::UnexpectedEof { location }) if location.offset == 2
        ));
        assert!(matches!(src.read_char(), Err(ParseError::UnexpectedEof { .. })));
    }

    #[test]
    fn skips_only_json_whitespace() {
        let mut src = CharSource::new(" \t\r\n\u{a0}x".as_bytes());
        src.skip_whitespace().unwrap();
        assert_eq!(src.read_char().unwrap(), '\u{a0}');
        assert_eq!(src.location(), Location { line: 2, column: 2, offset: 5 });
    }

    #[test]
    fn multibyte_across_refills() {
        let text = "é€😀z";
        let reader = Trickle { data: text.as_bytes(), chunk: 1 };
        let mut src = CharSource::with_buffer_size(reader, 2);
        assert_eq!(src.read_exact(4).unwrap(), text);
        assert_eq!(src.location().offset, 4);
        assert_eq!(src.peek().unwrap(), None);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'a', 0xFF];
        let mut src = CharSource::new(bytes);
        src.read_char().unwrap();
        assert!(matches!(
            src.peek(),
            Err(ParseError::Syntax { location, .. }) if location.offset == 1
        ));

        let truncated: &[u8] = &[0xE2, 0x82];
        assert!(CharSource::new(truncated).peek().is_err());

        let surrogate: &[u8] = &[0xED, 0xA0, 0x80];
        assert!(CharSource::new(surrogate).peek().is_err());
    }
}
