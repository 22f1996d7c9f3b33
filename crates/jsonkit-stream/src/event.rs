//! Parse events and the event-source surface shared by both parsers.

use std::sync::Arc;

use jsonkit_value::{ArrayBuilder, DuplicateKeyPolicy, Number, ObjectBuilder, Value};

use crate::error::ParseError;
use crate::source::Location;

/// One step of a JSON document in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    KeyName(String),
    String(Arc<str>),
    Number(Number),
    True,
    False,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Object,
    Array,
}

/// A pull source of [`Event`]s.
///
/// Implemented by [`StreamParser`](crate::StreamParser) over text and by
/// [`TreeParser`](crate::TreeParser) over an in-memory [`Value`].
pub trait EventSource {
    fn next_event(&mut self) -> Result<Event, ParseError>;

    /// False once the top-level value has been fully emitted.
    fn has_next(&self) -> bool;

    /// Position in the input; `None` for in-memory sources.
    fn location(&self) -> Option<Location>;

    /// Innermost open container.
    fn container(&self) -> Option<ContainerKind>;

    /// Policy used when materializing objects.
    fn duplicate_keys(&self) -> DuplicateKeyPolicy {
        DuplicateKeyPolicy::Last
    }

    /// Reads the next complete value.
    fn read_value(&mut self) -> Result<Value, ParseError> {
        let first = self.next_event()?;
        self.value_from(first)
    }

    /// Materializes the value that starts with `first`, which the caller has
    /// already pulled.
    fn value_from(&mut self, first: Event) -> Result<Value, ParseError> {
        let policy = self.duplicate_keys();
        let mut stack: Vec<Partial> = Vec::new();
        let mut event = first;
        loop {
            let value = match event {
                Event::StartArray => {
                    stack.push(Partial::Array(ArrayBuilder::new()));
                    event = self.next_event()?;
                    continue;
                }
                Event::StartObject => {
                    stack.push(Partial::Object(ObjectBuilder::new(policy), None));
                    event = self.next_event()?;
                    continue;
                }
                Event::KeyName(key) => {
                    match stack.last_mut() {
                        Some(Partial::Object(_, pending @ None)) => *pending = Some(key),
                        _ => return Err(misplaced(self, "key name")),
                    }
                    event = self.next_event()?;
                    continue;
                }
                Event::EndArray => match stack.pop() {
                    Some(Partial::Array(builder)) => builder.build(),
                    _ => return Err(misplaced(self, "end of array")),
                },
                Event::EndObject => match stack.pop() {
                    Some(Partial::Object(builder, None)) => builder.build(),
                    _ => return Err(misplaced(self, "end of object")),
                },
                Event::String(s) => Value::String(s),
                Event::Number(n) => Value::Number(n),
                Event::True => Value::True,
                Event::False => Value::False,
                Event::Null => Value::Null,
            };
            match stack.last_mut() {
                None => return Ok(value),
                Some(Partial::Array(builder)) => {
                    builder.push(value);
                }
                Some(Partial::Object(builder, pending)) => match pending.take() {
                    Some(key) => {
                        builder.add(key, value)?;
                    }
                    None => return Err(misplaced(self, "value without key")),
                },
            }
            event = self.next_event()?;
        }
    }

    /// Skips the rest of an array whose `StartArray` was already pulled.
    fn skip_array(&mut self) -> Result<(), ParseError> {
        skip_container(self)
    }

    /// Skips the rest of an object whose `StartObject` was already pulled.
    fn skip_object(&mut self) -> Result<(), ParseError> {
        skip_container(self)
    }

    /// Elements of an array whose `StartArray` was already pulled.
    fn array_values(&mut self) -> ArrayValues<'_, Self>
    where
        Self: Sized,
    {
        ArrayValues {
            source: self,
            done: false,
        }
    }

    /// Members of an object whose `StartObject` was already pulled.
    fn object_entries(&mut self) -> ObjectEntries<'_, Self>
    where
        Self: Sized,
    {
        ObjectEntries {
            source: self,
            done: false,
        }
    }

    /// Remaining events of the document.
    fn events(&mut self) -> Events<'_, Self>
    where
        Self: Sized,
    {
        Events {
            source: self,
            failed: false,
        }
    }
}

fn misplaced<S: EventSource + ?Sized>(source: &S, what: &str) -> ParseError {
    ParseError::syntax(
        format!("unexpected {what}"),
        source.location().unwrap_or_default(),
    )
}

enum Partial {
    Array(ArrayBuilder),
    Object(ObjectBuilder, Option<String>),
}

fn skip_container<S: EventSource + ?Sized>(source: &mut S) -> Result<(), ParseError> {
    let mut depth = 1usize;
    while depth > 0 {
        match source.next_event()? {
            Event::StartArray | Event::StartObject => depth += 1,
            Event::EndArray | Event::EndObject => depth -= 1,
            _ => {}
        }
    }
    Ok(())
}

// ── Iterators ─────────────────────────────────────────────────────────────

pub struct ArrayValues<'a, S> {
    source: &'a mut S,
    done: bool,
}

impl<S: EventSource> Iterator for ArrayValues<'_, S> {
    type Item = Result<Value, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.source.next_event() {
            Ok(Event::EndArray) => {
                self.done = true;
                return None;
            }
            Ok(event) => self.source.value_from(event),
            Err(e) => Err(e),
        };
        self.done = result.is_err();
        Some(result)
    }
}

pub struct ObjectEntries<'a, S> {
    source: &'a mut S,
    done: bool,
}

impl<S: EventSource> ObjectEntries<'_, S> {
    fn entry(&mut self, event: Event) -> Result<(String, Value), ParseError> {
        let Event::KeyName(key) = event else {
            return Err(misplaced(self.source, "value without key"));
        };
        let value = self.source.read_value()?;
        Ok((key, value))
    }
}

impl<S: EventSource> Iterator for ObjectEntries<'_, S> {
    type Item = Result<(String, Value), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.source.next_event() {
            Ok(Event::EndObject) => {
                self.done = true;
                return None;
            }
            Ok(event) => self.entry(event),
            Err(e) => Err(e),
        };
        self.done = result.is_err();
        Some(result)
    }
}

pub struct Events<'a, S> {
    source: &'a mut S,
    failed: bool,
}

impl<S: EventSource> Iterator for Events<'_, S> {
    type Item = Result<Event, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || !self.source.has_next() {
            return None;
        }
        let result = self.source.next_event();
        self.failed = result.is_err();
        Some(result)
    }
}
