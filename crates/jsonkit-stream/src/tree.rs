//! Event source over an in-memory value.

use std::slice;

use indexmap::IndexMap;
use jsonkit_value::Value;

use crate::error::ParseError;
use crate::event::{ContainerKind, Event, EventSource};
use crate::source::Location;

/// Emits the same event sequence for a [`Value`] that [`StreamParser`]
/// emits for its text.
///
/// Traversal keeps an explicit stack of frames, so depth is bounded only by
/// memory.
///
/// [`StreamParser`]: crate::StreamParser
pub struct TreeParser<'a> {
    start: Option<Start<'a>>,
    stack: Vec<Frame<'a>>,
}

enum Start<'a> {
    Value(&'a Value),
    Array(&'a [Value]),
    Object(&'a IndexMap<String, Value>),
}

enum Frame<'a> {
    Array(slice::Iter<'a, Value>),
    Object {
        entries: indexmap::map::Iter<'a, String, Value>,
        value: Option<&'a Value>,
    },
}

impl<'a> TreeParser<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self::starting_at(Start::Value(value))
    }

    pub fn from_array(items: &'a [Value]) -> Self {
        Self::starting_at(Start::Array(items))
    }

    pub fn from_object(entries: &'a IndexMap<String, Value>) -> Self {
        Self::starting_at(Start::Object(entries))
    }

    fn starting_at(start: Start<'a>) -> Self {
        TreeParser {
            start: Some(start),
            stack: Vec::new(),
        }
    }

    fn enter(&mut self, start: Start<'a>) -> Event {
        match start {
            Start::Array(items) => {
                self.stack.push(Frame::Array(items.iter()));
                Event::StartArray
            }
            Start::Object(entries) => {
                self.stack.push(Frame::Object {
                    entries: entries.iter(),
                    value: None,
                });
                Event::StartObject
            }
            Start::Value(value) => match value {
                Value::Array(items) => self.enter(Start::Array(items)),
                Value::Object(entries) => self.enter(Start::Object(entries)),
                Value::String(s) => Event::String(s.clone()),
                Value::Number(n) => Event::Number(n.clone()),
                Value::True => Event::True,
                Value::False => Event::False,
                Value::Null => Event::Null,
            },
        }
    }
}

impl EventSource for TreeParser<'_> {
    fn next_event(&mut self) -> Result<Event, ParseError> {
        if let Some(start) = self.start.take() {
            return Ok(self.enter(start));
        }
        let next = match self.stack.last_mut() {
            None => return Err(ParseError::NoMoreEvents),
            Some(Frame::Array(items)) => items.next(),
            Some(Frame::Object { entries, value }) => {
                if let Some(v) = value.take() {
                    Some(v)
                } else if let Some((key, v)) = entries.next() {
                    *value = Some(v);
                    return Ok(Event::KeyName(key.clone()));
                } else {
                    None
                }
            }
        };
        match next {
            Some(value) => Ok(self.enter(Start::Value(value))),
            None => match self.stack.pop() {
                Some(Frame::Object { .. }) => Ok(Event::EndObject),
                _ => Ok(Event::EndArray),
            },
        }
    }

    fn has_next(&self) -> bool {
        self.start.is_some() || !self.stack.is_empty()
    }

    fn location(&self) -> Option<Location> {
        None
    }

    fn container(&self) -> Option<ContainerKind> {
        self.stack.last().map(|frame| match frame {
            Frame::Array(_) => ContainerKind::Array,
            Frame::Object { .. } => ContainerKind::Object,
        })
    }
}
