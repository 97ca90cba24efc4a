use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a timeline entry: Unmarked -> Current -> Good | Bad.
/// Good and Bad are terminal for the entry they label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[serde(rename = "")]
    Unmarked,
    Current,
    Good,
    Bad,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Unmarked => "",
            Status::Current => "current",
            Status::Good => "good",
            Status::Bad => "bad",
        };
        f.write_str(s)
    }
}

/// One commit drawn into the global timeline. The hash is only unique within
/// its originating project; the timestamp is what orders the sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: Status,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

/// The persisted unit of work: the timeline, ascending by timestamp.
/// The order is fixed once built and never re-sorted after status mutations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub entries: Vec<TimelineEntry>,
}

impl Session {
    /// Seed a fresh session from a timestamp-sorted timeline: the newest
    /// entry is known bad (it is the upper bound the operator supplied),
    /// everything else starts unmarked.
    pub fn new(mut entries: Vec<TimelineEntry>) -> Self {
        if let Some(last) = entries.last_mut() {
            last.status = Status::Bad;
        }
        Self { entries }
    }
}
