//! Query Translator
//!
//! Runs a classified query against the backend. Point lookups use
//! `getTodoById`; everything else reads the full list once and then filters,
//! projects or counts locally. Nothing here writes.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{json, Map, Value};

use super::history::{HistoryEntry, QueryHistory, QueryOutcome};
use super::shape::{Output, QueryShape, RowFilter, Source};
use super::QueryError;
use crate::backend::TodoBackend;
use crate::domain::{AuthUser, Todo};

/// One result row, keyed by field name in insertion order
pub type Record = Map<String, Value>;

/// Rows plus the GraphQL query that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub graphql: &'static str,
    pub rows: Vec<Record>,
}

impl QueryOutput {
    pub fn to_value(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }
}

/// SQL-subset front end over a [`TodoBackend`]
pub struct QueryTranslator<B: ?Sized> {
    backend: Arc<B>,
    history: Arc<Mutex<QueryHistory>>,
}

impl<B: ?Sized> Clone for QueryTranslator<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            history: self.history.clone(),
        }
    }
}

fn to_record(todo: &Todo) -> Record {
    match serde_json::to_value(todo) {
        Ok(Value::Object(map)) => map,
        _ => Record::new(),
    }
}

fn count_row(count: usize) -> Record {
    let mut row = Record::new();
    row.insert("count".to_string(), json!(count));
    row
}

fn completed_count_row(completed: bool, count: usize) -> Record {
    let mut row = Record::new();
    row.insert("completed".to_string(), json!(completed));
    row.insert("count".to_string(), json!(count));
    row
}

/// Keep only the requested keys that exist, in request order
fn project(row: &Record, fields: &[String]) -> Record {
    fields
        .iter()
        .filter_map(|f| row.get(f).map(|v| (f.clone(), v.clone())))
        .collect()
}

impl<B: TodoBackend + ?Sized> QueryTranslator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            history: Arc::new(Mutex::new(QueryHistory::default())),
        }
    }

    /// Classify and run `sql`
    pub async fn execute(&self, sql: &str) -> Result<QueryOutput, QueryError> {
        let shape = QueryShape::classify(sql)?;
        tracing::debug!(?shape, "Executing query");
        let graphql = shape.graphql();

        let rows = match &shape.source {
            Source::ById(id) => match self.backend.get_todo(id).await? {
                Some(todo) => vec![to_record(&todo)],
                None => Vec::new(),
            },
            Source::FullScan => {
                let todos = self.backend.list_my_todos().await?;
                let kept: Vec<&Todo> = todos
                    .iter()
                    .filter(|t| match shape.filter {
                        RowFilter::None => true,
                        RowFilter::Completed(flag) => t.completed == flag,
                    })
                    .collect();

                match &shape.output {
                    Output::AllFields => kept.into_iter().map(to_record).collect(),
                    Output::Project(fields) => kept
                        .into_iter()
                        .map(|t| project(&to_record(t), fields))
                        .collect(),
                    Output::Count => vec![count_row(kept.len())],
                    Output::CountByCompleted => {
                        let done = kept.iter().filter(|t| t.completed).count();
                        vec![
                            completed_count_row(false, kept.len() - done),
                            completed_count_row(true, done),
                        ]
                    }
                }
            }
        };

        Ok(QueryOutput { graphql, rows })
    }

    /// Run `sql` and prepend the outcome to the history
    pub async fn run(&self, sql: &str) -> Result<QueryOutput, QueryError> {
        let result = self.execute(sql).await;
        let entry = match &result {
            Ok(output) => HistoryEntry {
                query: sql.to_string(),
                graphql: Some(output.graphql.to_string()),
                outcome: QueryOutcome::Rows(output.to_value()),
                timestamp: Utc::now(),
            },
            Err(e) => {
                tracing::warn!("Query failed: {}", e);
                HistoryEntry {
                    query: sql.to_string(),
                    graphql: None,
                    outcome: QueryOutcome::Failed(e.to_string()),
                    timestamp: Utc::now(),
                }
            }
        };
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .record(entry);
        result
    }

    /// Snapshot of the history, newest first
    pub fn history(&self) -> QueryHistory {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear_history(&self) {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// History belongs to one signed-in user; drop it whenever the user changes
    pub fn handle_session_change(&self, user: Option<&AuthUser>) {
        match user {
            Some(user) => tracing::debug!(uid = %user.uid, "Starting empty query history"),
            None => tracing::debug!("Session ended, clearing query history"),
        }
        self.clear_history();
    }
}
