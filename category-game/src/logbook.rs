//! Bounded, newest-first activity log.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::constants::{LOG_CAPACITY, LOG_TIMESTAMP_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl LogKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    /// Prefix drawn in front of the message by text renderers.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Info => "::",
            Self::Success => ">>",
            Self::Error => "!!",
            Self::Warning => "??",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub message: String,
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
}

impl LogEntry {
    #[must_use]
    pub fn new(kind: LogKind, message: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Build an entry stamped with the current local time.
    #[must_use]
    pub fn now(kind: LogKind, message: impl Into<String>) -> Self {
        let timestamp = chrono::Local::now()
            .format(LOG_TIMESTAMP_FORMAT)
            .to_string();
        Self::new(kind, message, timestamp)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp,
            self.kind.marker(),
            self.message
        )
    }
}

/// Log entries ordered most recent first. Holds at most [`LOG_CAPACITY`]
/// entries; pushing past capacity evicts the oldest. Deserialized books keep
/// only the newest [`LOG_CAPACITY`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "StoredLogBook")]
pub struct LogBook {
    entries: VecDeque<LogEntry>,
}

#[derive(Deserialize)]
struct StoredLogBook {
    #[serde(default)]
    entries: VecDeque<LogEntry>,
}

impl From<StoredLogBook> for LogBook {
    fn from(stored: StoredLogBook) -> Self {
        let mut entries = stored.entries;
        entries.truncate(LOG_CAPACITY);
        Self { entries }
    }
}

impl LogBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        self.push_entry(LogEntry::now(kind, message));
    }

    pub fn push_entry(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(LOG_CAPACITY);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn contains_message(&self, needle: &str) -> bool {
        self.entries.iter().any(|entry| entry.message.contains(needle))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
