/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_smithy_async::time::{SharedTimeSource, TimeSource};
use aws_smithy_types::date_time::{DateTime, Format};

/// A single timestamped line of the execution log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    timestamp: DateTime,
    text: String,
}

impl LogEntry {
    /// When the line was recorded, truncated to whole seconds (UTC)
    pub fn timestamp(&self) -> &DateTime {
        &self.timestamp
    }

    /// The logged text
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timestamp.fmt(Format::DateTime) {
            Ok(ts) => write!(f, "{ts} - {}", self.text),
            Err(_) => write!(f, "{} - {}", self.timestamp.secs(), self.text),
        }
    }
}

/// Append-only record of everything that happened during one invocation.
///
/// Entries are kept in the order they were recorded and are never reordered or deduplicated.
/// Each entry is mirrored to `tracing` at debug level as it is recorded.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    time_source: SharedTimeSource,
    entries: Vec<LogEntry>,
}

impl ExecutionLog {
    /// Create an empty log stamped by the given time source
    pub fn new(time_source: SharedTimeSource) -> Self {
        Self {
            time_source,
            entries: Vec::new(),
        }
    }

    /// Append a line
    pub fn record(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("{text}");
        let now = DateTime::from(self.time_source.now());
        self.entries.push(LogEntry {
            timestamp: DateTime::from_secs(now.secs()),
            text,
        });
    }

    /// The recorded entries in append order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join all entries, one per line
    pub fn join(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ExecutionLog {
    fn default() -> Self {
        Self::new(SharedTimeSource::default())
    }
}
