use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Server-assigned event identifier.
///
/// The server owns the format. Any JSON number or string is accepted and
/// serializes back in the form it arrived in, so ids outside the `i64` range
/// or with a fractional form survive a round trip.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(Number),
    Text(String),
}

impl EventId {
    /// An id typed by the user, kept exactly as written (minus surrounding
    /// whitespace). Used when the id is not known from a listing.
    pub fn raw(typed: &str) -> Self {
        Self::Text(typed.trim().to_owned())
    }

    /// True when `raw` is the textual form of this id, regardless of whether
    /// the server sent it as a number or a string.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Self::Number(n) => raw.parse::<Number>().is_ok_and(|r| r == *n),
            Self::Text(s) => s == raw,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EventId {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
