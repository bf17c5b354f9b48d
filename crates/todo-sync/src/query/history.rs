//! Query history, most recent first.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::format_result;

const PREVIEW_CHARS: usize = 50;

/// Result of one query run
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Rows as a JSON array
    Rows(Value),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub query: String,
    /// GraphQL display string; absent when the query was rejected
    pub graphql: Option<String>,
    pub outcome: QueryOutcome,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// First 50 characters of the query, with `...` when cut
    pub fn preview(&self) -> String {
        if self.query.chars().count() > PREVIEW_CHARS {
            let head: String = self.query.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            self.query.clone()
        }
    }

    /// Text shown in the results pane
    pub fn rendered(&self) -> String {
        match &self.outcome {
            QueryOutcome::Rows(value) => format_result(value),
            QueryOutcome::Failed(message) => message.clone(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryHistory {
    entries: Vec<HistoryEntry>,
}

impl QueryHistory {
    /// Prepend `entry`
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
