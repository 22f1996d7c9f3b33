//! Streaming JSON pull parser and generator.
//!
//! Text is read through a [`CharSource`] by a [`StreamParser`], which emits
//! [`Event`]s. A [`TreeParser`] emits the same events for an in-memory
//! [`Value`], and a [`Generator`] turns events back into text.
//!
//! # Example
//!
//! ```
//! use jsonkit_stream::{from_str, to_string, Event, EventSource, StreamParser};
//!
//! let value = from_str(r#"{"a": [1, 2.50]}"#).unwrap();
//! assert_eq!(to_string(&value).unwrap(), r#"{"a":[1,2.50]}"#);
//!
//! let mut parser = StreamParser::new(r#"[true]"#.as_bytes());
//! assert_eq!(parser.next_event().unwrap(), Event::StartArray);
//! assert_eq!(parser.next_event().unwrap(), Event::True);
//! ```

use std::io::{self, Read, Write};

use jsonkit_value::Value;

pub mod error;
pub mod event;
pub mod generator;
pub mod parser;
pub mod source;
pub mod tree;

pub use error::{GenerateError, ParseError};
pub use event::{ArrayValues, ContainerKind, Event, EventSource, Events, ObjectEntries};
pub use generator::{Generator, GeneratorOptions, GeneratorState};
pub use parser::{ParserOptions, ParserState, StreamParser};
pub use source::{CharSource, Location, DEFAULT_BUFFER_SIZE};
pub use tree::TreeParser;

// ── Parsing ───────────────────────────────────────────────────────────────

/// Parses a complete document; trailing non-whitespace is an error.
pub fn from_str(text: &str) -> Result<Value, ParseError> {
    from_reader(text.as_bytes())
}

pub fn from_reader<R: Read>(reader: R) -> Result<Value, ParseError> {
    from_reader_with(reader, ParserOptions::default())
}

pub fn from_reader_with<R: Read>(reader: R, options: ParserOptions) -> Result<Value, ParseError> {
    let mut parser = StreamParser::with_options(reader, options);
    let value = parser.read_value()?;
    parser.ensure_end()?;
    Ok(value)
}

// ── Generation ────────────────────────────────────────────────────────────

pub fn to_writer<W: Write>(writer: W, value: &Value) -> Result<W, GenerateError> {
    to_writer_with(writer, value, GeneratorOptions::default())
}

pub fn to_writer_with<W: Write>(
    writer: W,
    value: &Value,
    options: GeneratorOptions,
) -> Result<W, GenerateError> {
    let mut generator = Generator::with_options(writer, options);
    generator.write_value(value)?;
    generator.finish()
}

pub fn to_string(value: &Value) -> Result<String, GenerateError> {
    to_string_with(value, GeneratorOptions::default())
}

pub fn to_string_pretty(value: &Value) -> Result<String, GenerateError> {
    to_string_with(
        value,
        GeneratorOptions {
            pretty: true,
            ..GeneratorOptions::default()
        },
    )
}

fn to_string_with(value: &Value, options: GeneratorOptions) -> Result<String, GenerateError> {
    let bytes = to_writer_with(Vec::new(), value, options)?;
    String::from_utf8(bytes).map_err(|e| GenerateError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
