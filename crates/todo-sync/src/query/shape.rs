//! Query Shapes
//!
//! Classification of a SQL string into one of the fixed supported shapes.
//! Matching is substring/pattern based on purpose: one predicate, no OR,
//! keywords case-insensitive, literals case-preserved.

use std::sync::OnceLock;

use regex::Regex;

use super::QueryError;

pub const GET_TODO_BY_ID_GRAPHQL: &str = "query GetTodoById($id: UUID!) {
  todo(id: $id) {
    id
    text
    completed
    createdAt
    updatedAt
  }
}";

pub const GET_MY_TODOS_GRAPHQL: &str = "query GetMyTodos {
  todos(where: {userId: {eq_expr: \"auth.uid\"}}, orderBy: [{createdAt: DESC}]) {
    id
    text
    completed
    createdAt
    updatedAt
  }
}";

/// Which backend read serves the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Every todo of the current user
    FullScan,
    /// Point lookup by id literal
    ById(String),
}

/// In-memory row filter applied after a full scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    None,
    Completed(bool),
}

/// Shape of the returned rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    AllFields,
    Project(Vec<String>),
    Count,
    CountByCompleted,
}

/// A classified query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryShape {
    pub source: Source,
    pub filter: RowFilter,
    pub output: Output,
}

fn id_predicate() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)where\s+id\s*=\s*['"]([^'"]+)['"]"#).ok())
        .as_ref()
}

fn select_list() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)select\s+(.*?)\s+from").ok())
        .as_ref()
}

impl QueryShape {
    /// Classify `sql` without touching the backend
    pub fn classify(sql: &str) -> Result<Self, QueryError> {
        let normalized = sql.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        if normalized.contains("from users") {
            return Err(QueryError::PrivacyRestricted);
        }
        if !normalized.contains("from todos") {
            return Err(QueryError::UnsupportedStatement);
        }

        if let Some(caps) = id_predicate().and_then(|re| re.captures(sql)) {
            return Ok(Self {
                source: Source::ById(caps[1].to_string()),
                filter: RowFilter::None,
                output: Output::AllFields,
            });
        }

        let filter = if !normalized.contains("where") {
            RowFilter::None
        } else if normalized.contains("completed = true") {
            RowFilter::Completed(true)
        } else if normalized.contains("completed = false") {
            RowFilter::Completed(false)
        } else {
            RowFilter::None
        };

        let output = match select_list().and_then(|re| re.captures(sql)) {
            Some(caps) => {
                let fields = caps[1].trim();
                if fields == "*" {
                    Output::AllFields
                } else if fields.to_lowercase().contains("count(") {
                    if normalized.contains("group by completed") {
                        Output::CountByCompleted
                    } else {
                        Output::Count
                    }
                } else {
                    Output::Project(
                        fields
                            .split(',')
                            .map(|f| f.trim().replace('`', ""))
                            .collect(),
                    )
                }
            }
            None => Output::AllFields,
        };

        Ok(Self {
            source: Source::FullScan,
            filter,
            output,
        })
    }

    /// Backend query shown next to the results
    pub fn graphql(&self) -> &'static str {
        match self.source {
            Source::FullScan => GET_MY_TODOS_GRAPHQL,
            Source::ById(_) => GET_TODO_BY_ID_GRAPHQL,
        }
    }
}
