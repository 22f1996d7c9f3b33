//! Streaming JSON generator.

use std::fmt;
use std::io::Write;

use jsonkit_value::{Number, Value};

use crate::error::GenerateError;
use crate::event::{ContainerKind, Event, EventSource};
use crate::tree::TreeParser;

// ── Options ───────────────────────────────────────────────────────────────

/// Configuration for a [`Generator`].
#[derive(Debug, Clone, Copy)]
pub struct GeneratorOptions {
    /// Put every member on its own line, indented by nesting depth.
    ///
    /// # Default
    ///
    /// `false`
    pub pretty: bool,

    /// Spaces per nesting level when `pretty` is set.
    ///
    /// # Default
    ///
    /// `4`
    pub indent: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            pretty: false,
            indent: 4,
        }
    }
}

// ── State ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// Nothing written yet.
    Init,
    /// Inside an object, before a key or the closing brace.
    ObjectKey,
    /// Inside an object, after a key.
    ObjectValue,
    /// Inside an array.
    ArrayValue,
    /// The top-level value is complete.
    End,
}

impl GeneratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorState::Init => "INIT",
            GeneratorState::ObjectKey => "OBJECT_KEY",
            GeneratorState::ObjectValue => "OBJECT_VALUE",
            GeneratorState::ArrayValue => "ARRAY_VALUE",
            GeneratorState::End => "END",
        }
    }
}

impl fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Generator ─────────────────────────────────────────────────────────────

/// Writes one JSON document to `W`, enforcing well-formedness as it goes.
///
/// Every write is checked against the current state; a misplaced write
/// fails with [`GenerateError::InvalidState`] and writes nothing.
#[derive(Debug)]
pub struct Generator<W: Write> {
    writer: W,
    state: GeneratorState,
    stack: Vec<ContainerKind>,
    /// A sibling was already written at the current level.
    comma: bool,
    options: GeneratorOptions,
}

impl<W: Write> Generator<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, GeneratorOptions::default())
    }

    pub fn with_options(writer: W, options: GeneratorOptions) -> Self {
        Generator {
            writer,
            state: GeneratorState::Init,
            stack: Vec::new(),
            comma: false,
            options,
        }
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn write_start_object(&mut self) -> Result<&mut Self, GenerateError> {
        self.before_value("write_start_object")?;
        self.writer.write_all(b"{")?;
        self.open(ContainerKind::Object);
        Ok(self)
    }

    pub fn write_start_array(&mut self) -> Result<&mut Self, GenerateError> {
        self.before_value("write_start_array")?;
        self.writer.write_all(b"[")?;
        self.open(ContainerKind::Array);
        Ok(self)
    }

    pub fn write_key(&mut self, name: &str) -> Result<&mut Self, GenerateError> {
        self.require(GeneratorState::ObjectKey, "write_key")?;
        if self.comma {
            self.writer.write_all(b",")?;
        }
        self.newline(self.stack.len())?;
        write_escaped(&mut self.writer, name)?;
        let separator: &[u8] = if self.options.pretty { b": " } else { b":" };
        self.writer.write_all(separator)?;
        self.state = GeneratorState::ObjectValue;
        Ok(self)
    }

    /// Closes the innermost container.
    pub fn write_end(&mut self) -> Result<&mut Self, GenerateError> {
        self.close(None, "write_end")
    }

    fn close(&mut self, expected: Option<ContainerKind>, operation: &'static str) -> Result<&mut Self, GenerateError> {
        let kind = match (self.state, self.stack.last()) {
            (GeneratorState::ObjectKey, Some(ContainerKind::Object)) => ContainerKind::Object,
            (GeneratorState::ArrayValue, Some(ContainerKind::Array)) => ContainerKind::Array,
            _ => return Err(self.invalid(operation)),
        };
        if expected.is_some_and(|e| e != kind) {
            return Err(self.invalid(operation));
        }
        self.stack.pop();
        if self.comma {
            self.newline(self.stack.len())?;
        }
        self.writer.write_all(match kind {
            ContainerKind::Object => b"}",
            ContainerKind::Array => b"]",
        })?;
        self.after_value();
        Ok(self)
    }

    pub fn write_str(&mut self, value: &str) -> Result<&mut Self, GenerateError> {
        self.before_value("write_str")?;
        write_escaped(&mut self.writer, value)?;
        self.after_value();
        Ok(self)
    }

    pub fn write_number(&mut self, value: &Number) -> Result<&mut Self, GenerateError> {
        self.scalar("write_number", format_args!("{value}"))
    }

    pub fn write_i64(&mut self, value: i64) -> Result<&mut Self, GenerateError> {
        self.scalar("write_i64", format_args!("{value}"))
    }

    pub fn write_u64(&mut self, value: u64) -> Result<&mut Self, GenerateError> {
        self.scalar("write_u64", format_args!("{value}"))
    }

    /// Rejects NaN and infinities before anything is written.
    pub fn write_f64(&mut self, value: f64) -> Result<&mut Self, GenerateError> {
        let number = Number::try_from(value).map_err(|_| GenerateError::NotFinite)?;
        self.scalar("write_f64", format_args!("{number}"))
    }

    pub fn write_bool(&mut self, value: bool) -> Result<&mut Self, GenerateError> {
        let text = if value { "true" } else { "false" };
        self.scalar("write_bool", format_args!("{text}"))
    }

    pub fn write_null(&mut self) -> Result<&mut Self, GenerateError> {
        self.scalar("write_null", format_args!("null"))
    }

    /// Writes a complete value in place of a single scalar.
    pub fn write_value(&mut self, value: &Value) -> Result<&mut Self, GenerateError> {
        self.expect_value("write_value")?;
        let mut events = TreeParser::new(value);
        while events.has_next() {
            // A tree source only fails past its end, which `has_next` rules out.
            let event = events.next_event().map_err(|_| self.invalid("write_value"))?;
            self.write_event(event)?;
        }
        Ok(self)
    }

    /// Bridges an event from any [`EventSource`] onto the output.
    pub fn write_event(&mut self, event: Event) -> Result<&mut Self, GenerateError> {
        match event {
            Event::StartObject => self.write_start_object(),
            Event::StartArray => self.write_start_array(),
            Event::EndObject => self.close(Some(ContainerKind::Object), "write_event"),
            Event::EndArray => self.close(Some(ContainerKind::Array), "write_event"),
            Event::KeyName(name) => self.write_key(&name),
            Event::String(s) => self.write_str(&s),
            Event::Number(n) => self.write_number(&n),
            Event::True => self.write_bool(true),
            Event::False => self.write_bool(false),
            Event::Null => self.write_null(),
        }
    }

    pub fn flush(&mut self) -> Result<(), GenerateError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Checks the document is complete, flushes, and returns the writer.
    pub fn finish(mut self) -> Result<W, GenerateError> {
        self.require(GeneratorState::End, "finish")?;
        self.writer.flush()?;
        log::trace!("generator finished");
        Ok(self.writer)
    }

    // ── State checks ──────────────────────────────────────────────────────

    fn invalid(&self, operation: &'static str) -> GenerateError {
        GenerateError::InvalidState {
            operation,
            state: self.state,
        }
    }

    fn require(&self, state: GeneratorState, operation: &'static str) -> Result<(), GenerateError> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn expect_value(&self, operation: &'static str) -> Result<(), GenerateError> {
        match self.state {
            GeneratorState::Init | GeneratorState::ObjectValue | GeneratorState::ArrayValue => Ok(()),
            GeneratorState::ObjectKey | GeneratorState::End => Err(self.invalid(operation)),
        }
    }

    /// Checks that a value may be written here and emits its separator.
    fn before_value(&mut self, operation: &'static str) -> Result<(), GenerateError> {
        self.expect_value(operation)?;
        if self.state == GeneratorState::ArrayValue {
            if self.comma {
                self.writer.write_all(b",")?;
            }
            self.newline(self.stack.len())?;
        }
        Ok(())
    }

    fn scalar(&mut self, operation: &'static str, text: fmt::Arguments<'_>) -> Result<&mut Self, GenerateError> {
        self.before_value(operation)?;
        self.writer.write_fmt(text)?;
        self.after_value();
        Ok(self)
    }

    fn open(&mut self, kind: ContainerKind) {
        self.stack.push(kind);
        self.comma = false;
        self.state = match kind {
            ContainerKind::Object => GeneratorState::ObjectKey,
            ContainerKind::Array => GeneratorState::ArrayValue,
        };
    }

    fn after_value(&mut self) {
        self.comma = true;
        self.state = match self.stack.last() {
            None => GeneratorState::End,
            Some(ContainerKind::Object) => GeneratorState::ObjectKey,
            Some(ContainerKind::Array) => GeneratorState::ArrayValue,
        };
    }

    fn newline(&mut self, depth: usize) -> Result<(), GenerateError> {
        if self.options.pretty {
            self.writer.write_all(b"\n")?;
            for _ in 0..depth * self.options.indent {
                self.writer.write_all(b" ")?;
            }
        }
        Ok(())
    }
}

/// Writes `value` as a quoted JSON string.
///
/// Quote, backslash and the short control escapes use their two-character
/// form; any other control character is written as `\uXXXX`.
fn write_escaped<W: Write>(writer: &mut W, value: &str) -> std::io::Result<()> {
    writer.write_all(b"\"")?;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        let short: &[u8] = match c {
            '"' => b"\\\"",
            '\\' => b"\\\\",
            '\u{8}' => b"\\b",
            '\u{c}' => b"\\f",
            '\n' => b"\\n",
            '\r' => b"\\r",
            '\t' => b"\\t",
            c if c.is_control() => b"",
            _ => continue,
        };
        writer.write_all(value[start..i].as_bytes())?;
        if short.is_empty() {
            write!(writer, "\\u{:04x}", c as u32)?;
        } else {
            writer.write_all(short)?;
        }
        start = i + c.len_utf8();
    }
    writer.write_all(value[start..].as_bytes())?;
    writer.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(f: impl FnOnce(&mut Generator<Vec<u8>>) -> Result<(), GenerateError>) -> String {
        let mut g = Generator::new(Vec::new());
        f(&mut g).unwrap();
        String::from_utf8(g.finish().unwrap()).unwrap()
    }

    #[test]
    fn writes_nested_document() {
        let out = generate(|g| {
            g.write_start_object()?
                .write_key("a")?
                .write_start_array()?
                .write_i64(-1)?
                .write_u64(2)?
                .write_bool(true)?
                .write_null()?
                .write_end()?
                .write_key("b")?
                .write_str("x")?
                .write_key("c")?
                .write_start_object()?
                .write_end()?
                .write_end()?;
            Ok(())
        });
        assert_eq!(out, r#"{"a":[-1,2,true,null],"b":"x","c":{}}"#);
    }

    #[test]
    fn top_level_scalar() {
        let out = generate(|g| {
            g.write_f64(1.5)?;
            Ok(())
        });
        assert_eq!(out, "1.5");
    }

    #[test]
    fn exact_number_text() {
        let n: Number = "100000000000000000000.50".parse().unwrap();
        let out = generate(|g| {
            g.write_number(&n)?;
            Ok(())
        });
        assert_eq!(out, "100000000000000000000.50");
    }

    #[test]
    fn escapes_strings() {
        let out = generate(|g| {
            g.write_str("q\"b\\s/\u{8}\u{c}\n\r\t\u{0}\u{1f}\u{7f}\u{85}é😀")?;
            Ok(())
        });
        assert_eq!(
            out,
            r#""q\"b\\s/\b\f\n\r\t\u0000\u001f\u007f\u0085é😀""#
        );
    }

    #[test]
    fn write_end_without_container_fails() {
        let mut g = Generator::new(Vec::new());
        assert!(matches!(
            g.write_end(),
            Err(GenerateError::InvalidState { operation: "write_end", state: GeneratorState::Init })
        ));
    }

    #[test]
    fn write_key_outside_object_fails() {
        let mut g = Generator::new(Vec::new());
        assert!(matches!(g.write_key("a"), Err(GenerateError::InvalidState { .. })));
        g.write_start_array().unwrap();
        assert!(matches!(g.write_key("a"), Err(GenerateError::InvalidState { .. })));
    }

    #[test]
    fn value_without_key_fails() {
        let mut g = Generator::new(Vec::new());
        g.write_start_object().unwrap();
        assert!(matches!(g.write_null(), Err(GenerateError::InvalidState { .. })));
        assert!(matches!(g.write_start_array(), Err(GenerateError::InvalidState { .. })));
    }

    #[test]
    fn dangling_key_blocks_end() {
        let mut g = Generator::new(Vec::new());
        g.write_start_object().unwrap().write_key("a").unwrap();
        assert!(matches!(g.write_end(), Err(GenerateError::InvalidState { .. })));
        assert!(matches!(g.write_key("b"), Err(GenerateError::InvalidState { .. })));
    }

    #[test]
    fn writes_after_end_fail() {
        let mut g = Generator::new(Vec::new());
        g.write_null().unwrap();
        assert_eq!(g.state(), GeneratorState::End);
        assert!(matches!(g.write_null(), Err(GenerateError::InvalidState { state: GeneratorState::End, .. })));
        assert!(matches!(g.write_start_object(), Err(GenerateError::InvalidState { .. })));
        assert!(matches!(g.write_end(), Err(GenerateError::InvalidState { .. })));
        g.flush().unwrap();
        assert_eq!(g.finish().unwrap(), b"null");
    }

    #[test]
    fn finish_requires_complete_document() {
        let mut g = Generator::new(Vec::new());
        g.write_start_array().unwrap();
        assert!(matches!(
            g.finish(),
            Err(GenerateError::InvalidState { operation: "finish", state: GeneratorState::ArrayValue })
        ));
    }

    #[test]
    fn non_finite_rejected_before_output() {
        let mut g = Generator::new(Vec::new());
        g.write_start_array().unwrap();
        assert!(matches!(g.write_f64(f64::NAN), Err(GenerateError::NotFinite)));
        assert!(matches!(g.write_f64(f64::NEG_INFINITY), Err(GenerateError::NotFinite)));
        g.write_i64(1).unwrap().write_end().unwrap();
        assert_eq!(g.finish().unwrap(), b"[1]");
    }

    #[test]
    fn write_value_inside_container() {
        let value = crate::from_str(r#"{"k":[1,{"z":null}],"e":[]}"#).unwrap();
        let out = generate(|g| {
            g.write_start_array()?
                .write_value(&value)?
                .write_value(&Value::True)?
                .write_end()?;
            Ok(())
        });
        assert_eq!(out, r#"[{"k":[1,{"z":null}],"e":[]},true]"#);
    }

    #[test]
    fn write_value_handles_deep_nesting() {
        let depth = 100_000;
        let mut value = Value::Null;
        for _ in 0..depth {
            value = Value::array(vec![value]);
        }
        let mut g = Generator::new(Vec::new());
        g.write_value(&value).unwrap();
        assert_eq!(g.state(), GeneratorState::End);
        let out = g.finish().unwrap();
        assert_eq!(out.len(), 2 * depth + 4);
        assert!(out.starts_with(b"[[") && out.ends_with(b"null]]"));
    }

    #[test]
    fn write_event_checks_container_kind() {
        let mut g = Generator::new(Vec::new());
        g.write_event(Event::StartArray).unwrap();
        assert!(matches!(g.write_event(Event::EndObject), Err(GenerateError::InvalidState { .. })));
        g.write_event(Event::EndArray).unwrap();
        assert_eq!(g.finish().unwrap(), b"[]");
    }

    #[test]
    fn write_value_respects_state() {
        let mut g = Generator::new(Vec::new());
        g.write_start_object().unwrap();
        assert!(matches!(g.write_value(&Value::Null), Err(GenerateError::InvalidState { .. })));
    }

    #[test]
    fn pretty_output() {
        let value = crate::from_str(r#"{"a":[1,2],"b":{},"c":[]}"#).unwrap();
        let options = GeneratorOptions { pretty: true, indent: 2 };
        let mut g = Generator::with_options(Vec::new(), options);
        g.write_value(&value).unwrap();
        let out = String::from_utf8(g.finish().unwrap()).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {},\n  \"c\": []\n}");
    }
}
