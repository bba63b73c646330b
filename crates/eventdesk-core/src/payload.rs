//! Normalization of list responses.
//!
//! The collection endpoint answers either with a bare JSON array of events or
//! with a HAL envelope carrying the array at `_embedded.events`. Anything else
//! decodes to [`ListPayload::Unrecognized`], which callers treat as an empty
//! collection.

use serde_json::Value;

use crate::errors::ApiError;
use crate::event::Event;

const EMBEDDED_KEY: &str = "_embedded";
const EVENTS_KEY: &str = "events";

#[derive(Clone, Debug, PartialEq)]
pub enum ListPayload {
    /// `[ {...}, ... ]`
    Bare(Vec<Event>),
    /// `{ "_embedded": { "events": [ {...}, ... ] } }`
    Embedded(Vec<Event>),
    /// Valid JSON of some other shape. Holds a short description for logs.
    Unrecognized(String),
}

impl ListPayload {
    /// Decode a raw response body.
    ///
    /// An empty body is an unrecognized shape. A body that is not JSON at all,
    /// or an array whose elements are not events, is a format error.
    pub fn from_slice(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::Unrecognized("empty body".into()));
        }
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(_) => Ok(Self::Bare(serde_json::from_value(value)?)),
            Value::Object(mut map) => {
                let nested = map
                    .get_mut(EMBEDDED_KEY)
                    .and_then(Value::as_object_mut)
                    .and_then(|embedded| embedded.remove(EVENTS_KEY));
                match nested {
                    Some(events @ Value::Array(_)) => {
                        Ok(Self::Embedded(serde_json::from_value(events)?))
                    }
                    _ => Ok(Self::Unrecognized("object without _embedded.events array".into())),
                }
            }
            other => Ok(Self::Unrecognized(describe(&other).into())),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    pub fn into_events(self) -> Vec<Event> {
        match self {
            Self::Bare(events) | Self::Embedded(events) => events,
            Self::Unrecognized(_) => Vec::new(),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
