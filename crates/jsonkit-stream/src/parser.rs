//! Streaming pull parser over UTF-8 text.
//!
//! The parser is a hand-written state machine with an explicit container
//! stack. Each call to [`EventSource::next_event`] lexes exactly one token
//! (plus the `:` after a key) and emits one [`Event`].

use std::io::Read;
use std::sync::Arc;

use jsonkit_value::{DuplicateKeyPolicy, Number};

use crate::error::ParseError;
use crate::event::{ContainerKind, Event, EventSource};
use crate::source::{CharSource, Location, DEFAULT_BUFFER_SIZE};

// ── Options ───────────────────────────────────────────────────────────────

/// Configuration for a [`StreamParser`].
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Size of the byte buffer between the reader and the decoder.
    ///
    /// # Default
    ///
    /// `4096`
    pub buffer_size: usize,

    /// Policy applied when materializing objects through
    /// [`EventSource::read_value`].
    ///
    /// # Default
    ///
    /// [`DuplicateKeyPolicy::Last`]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
            duplicate_keys: DuplicateKeyPolicy::Last,
        }
    }
}

// ── State ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Init,
    ObjectInit,
    ObjectKey,
    ObjectValue,
    ObjectComma,
    ArrayInit,
    ArrayValue,
    ArrayComma,
    End,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: ContainerKind,
    /// State to return to once this container closes.
    resume: ParserState,
}

// ── Parser ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct StreamParser<R> {
    source: CharSource<R>,
    state: ParserState,
    stack: Vec<Frame>,
    options: ParserOptions,
}

impl<R: Read> StreamParser<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        StreamParser {
            source: CharSource::with_buffer_size(reader, options.buffer_size),
            state: ParserState::Init,
            stack: Vec::new(),
            options,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    /// Checks that the document is complete and only whitespace follows it.
    pub fn ensure_end(&mut self) -> Result<(), ParseError> {
        if self.state != ParserState::End {
            return Err(self.unexpected("end of document"));
        }
        self.source.skip_whitespace()?;
        match self.source.peek()? {
            None => Ok(()),
            Some(c) => Err(ParseError::syntax(
                format!("trailing data {c:?} after document"),
                self.source.location(),
            )),
        }
    }

    // ── Structure ─────────────────────────────────────────────────────────

    /// Emits the event for the value starting at the lookahead character.
    fn value_event(&mut self) -> Result<Event, ParseError> {
        let after = match self.state {
            ParserState::Init => ParserState::End,
            ParserState::ObjectValue => ParserState::ObjectComma,
            _ => ParserState::ArrayComma,
        };
        let event = match self.source.peek()? {
            Some('{') => {
                self.source.bump();
                self.open(ContainerKind::Object, after);
                return Ok(Event::StartObject);
            }
            Some('[') => {
                self.source.bump();
                self.open(ContainerKind::Array, after);
                return Ok(Event::StartArray);
            }
            Some('"') => Event::String(Arc::from(self.read_string()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => Event::Number(self.read_number()?),
            Some(c) if c.is_ascii_lowercase() => self.read_keyword()?,
            _ => return Err(self.unexpected("value")),
        };
        self.set_state(after);
        Ok(event)
    }

    /// Emits the key at the lookahead character and consumes the `:`.
    fn key_event(&mut self) -> Result<Event, ParseError> {
        if self.source.peek()? != Some('"') {
            return Err(self.unexpected("'\"'"));
        }
        let key = self.read_string()?;
        self.source.skip_whitespace()?;
        if self.source.peek()? != Some(':') {
            return Err(self.unexpected("':'"));
        }
        self.source.bump();
        self.state = ParserState::ObjectValue;
        Ok(Event::KeyName(key))
    }

    fn open(&mut self, kind: ContainerKind, resume: ParserState) {
        self.stack.push(Frame { kind, resume });
        self.state = match kind {
            ContainerKind::Object => ParserState::ObjectInit,
            ContainerKind::Array => ParserState::ArrayInit,
        };
    }

    /// Consumes the closing bracket at the lookahead character.
    fn close(&mut self, kind: ContainerKind) -> Result<Event, ParseError> {
        let location = self.source.location();
        match self.stack.pop() {
            Some(frame) if frame.kind == kind => {
                self.source.bump();
                self.set_state(frame.resume);
                Ok(match kind {
                    ContainerKind::Object => Event::EndObject,
                    ContainerKind::Array => Event::EndArray,
                })
            }
            _ => Err(ParseError::syntax("unbalanced closing bracket", location)),
        }
    }

    fn set_state(&mut self, state: ParserState) {
        self.state = state;
        if state == ParserState::End {
            log::trace!("document complete at {}", self.source.location());
        }
    }

    /// Error for an unexpected lookahead character, or end of input.
    fn unexpected(&mut self, expected: &str) -> ParseError {
        let location = self.source.location();
        match self.source.peek() {
            Ok(Some(c)) => ParseError::syntax(format!("expected {expected}, found {c:?}"), location),
            Ok(None) => ParseError::UnexpectedEof { location },
            Err(e) => e,
        }
    }

    // ── Strings ───────────────────────────────────────────────────────────

    /// Lexes a string whose opening quote is the lookahead character.
    fn read_string(&mut self) -> Result<String, ParseError> {
        self.source.bump();
        let mut out = String::new();
        loop {
            let location = self.source.location();
            match self.source.read_char()? {
                '"' => return Ok(out),
                '\\' => self.read_escape(&mut out)?,
                c if c < '\u{20}' => {
                    return Err(ParseError::syntax(
                        format!("unescaped control character U+{:04X}", c as u32),
                        location,
                    ))
                }
                c => out.push(c),
            }
        }
    }

    fn read_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let location = self.source.location();
        let c = match self.source.read_char()? {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => self.read_unicode_escape(location)?,
            other => {
                return Err(ParseError::syntax(
                    format!("invalid escape '\\{other}'"),
                    location,
                ))
            }
        };
        out.push(c);
        Ok(())
    }

    /// Decodes the digits of a `\u` escape, combining surrogate pairs.
    fn read_unicode_escape(&mut self, location: Location) -> Result<char, ParseError> {
        let unpaired = || ParseError::syntax("unpaired surrogate", location);
        let unit = self.read_hex4()?;
        let code = match unit {
            0xD800..=0xDBFF => {
                if self.source.peek()? != Some('\\') {
                    return Err(unpaired());
                }
                self.source.bump();
                if self.source.read_char()? != 'u' {
                    return Err(unpaired());
                }
                let low = self.read_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(unpaired());
                }
                0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(unpaired()),
            _ => unit,
        };
        char::from_u32(code).ok_or_else(unpaired)
    }

    fn read_hex4(&mut self) -> Result<u32, ParseError> {
        let location = self.source.location();
        let digits = self.source.read_exact(4)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseError::syntax(
                format!("invalid unicode escape {digits:?}"),
                location,
            ));
        }
        u32::from_str_radix(&digits, 16)
            .map_err(|_| ParseError::syntax("invalid unicode escape", location))
    }

    // ── Numbers ───────────────────────────────────────────────────────────

    /// Lexes `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
    fn read_number(&mut self) -> Result<Number, ParseError> {
        let start = self.source.location();
        let mut text = String::new();
        if self.source.peek()? == Some('-') {
            self.take(&mut text);
        }
        match self.source.peek()? {
            Some('0') => self.take(&mut text),
            Some('1'..='9') => self.take_digits(&mut text)?,
            _ => return Err(self.unexpected("digit")),
        }
        if self.source.peek()? == Some('.') {
            self.take(&mut text);
            self.require_digits(&mut text)?;
        }
        if let Some('e' | 'E') = self.source.peek()? {
            self.take(&mut text);
            if let Some('+' | '-') = self.source.peek()? {
                self.take(&mut text);
            }
            self.require_digits(&mut text)?;
        }
        text.parse::<Number>().map_err(|e| {
            ParseError::syntax(format!("number {text} out of range: {e}"), start)
        })
    }

    fn take(&mut self, text: &mut String) {
        if let Ok(Some(c)) = self.source.peek() {
            text.push(c);
            self.source.bump();
        }
    }

    fn take_digits(&mut self, text: &mut String) -> Result<(), ParseError> {
        while let Some(c @ '0'..='9') = self.source.peek()? {
            text.push(c);
            self.source.bump();
        }
        Ok(())
    }

    fn require_digits(&mut self, text: &mut String) -> Result<(), ParseError> {
        match self.source.peek()? {
            Some('0'..='9') => self.take_digits(text),
            _ => Err(self.unexpected("digit")),
        }
    }

    // ── Keywords ──────────────────────────────────────────────────────────

    fn read_keyword(&mut self) -> Result<Event, ParseError> {
        let location = self.source.location();
        let mut word = String::with_capacity(5);
        while word.len() < 5 {
            match self.source.peek()? {
                Some(c) if c.is_ascii_lowercase() => {
                    word.push(c);
                    self.source.bump();
                }
                _ => break,
            }
        }
        match word.as_str() {
            "true" => Ok(Event::True),
            "false" => Ok(Event::False),
            "null" => Ok(Event::Null),
            _ => Err(ParseError::UnknownKeyword {
                keyword: word,
                location,
            }),
        }
    }
}

impl<R: Read> EventSource for StreamParser<R> {
    fn next_event(&mut self) -> Result<Event, ParseError> {
        if self.state == ParserState::End {
            return Err(ParseError::NoMoreEvents);
        }
        self.source.skip_whitespace()?;
        match self.state {
            ParserState::Init | ParserState::ObjectValue | ParserState::ArrayValue => {
                self.value_event()
            }
            ParserState::ArrayInit => match self.source.peek()? {
                Some(']') => self.close(ContainerKind::Array),
                _ => self.value_event(),
            },
            ParserState::ObjectInit => match self.source.peek()? {
                Some('}') => self.close(ContainerKind::Object),
                _ => self.key_event(),
            },
            ParserState::ObjectKey => self.key_event(),
            ParserState::ObjectComma => match self.source.peek()? {
                Some('}') => self.close(ContainerKind::Object),
                Some(',') => {
                    self.source.bump();
                    self.state = ParserState::ObjectKey;
                    self.source.skip_whitespace()?;
                    self.key_event()
                }
                _ => Err(self.unexpected("',' or '}'")),
            },
            ParserState::ArrayComma => match self.source.peek()? {
                Some(']') => self.close(ContainerKind::Array),
                Some(',') => {
                    self.source.bump();
                    self.state = ParserState::ArrayValue;
                    self.source.skip_whitespace()?;
                    self.value_event()
                }
                _ => Err(self.unexpected("',' or ']'")),
            },
            ParserState::End => Err(ParseError::NoMoreEvents),
        }
    }

    fn has_next(&self) -> bool {
        self.state != ParserState::End
    }

    fn location(&self) -> Option<Location> {
        Some(self.source.location())
    }

    fn container(&self) -> Option<ContainerKind> {
        self.stack.last().map(|frame| frame.kind)
    }

    fn duplicate_keys(&self) -> DuplicateKeyPolicy {
        self.options.duplicate_keys
    }
}
