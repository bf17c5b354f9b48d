//! SQL Playground
//!
//! Translates a handful of fixed SELECT shapes over the `todos` relation into
//! backend reads, then filters, projects or counts in memory.

mod examples;
mod format;
mod history;
mod shape;
mod translator;

use thiserror::Error;

use crate::domain::DomainError;

pub use examples::{ExampleQuery, EXAMPLE_QUERIES};
pub use format::format_result;
pub use history::{HistoryEntry, QueryHistory, QueryOutcome};
pub use shape::{Output, QueryShape, RowFilter, Source, GET_MY_TODOS_GRAPHQL, GET_TODO_BY_ID_GRAPHQL};
pub use translator::{QueryOutput, QueryTranslator, Record};

/// Errors raised by the SQL playground
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Please enter a SQL query")]
    EmptyQuery,

    #[error("User queries are not supported in this demo (privacy reasons)")]
    PrivacyRestricted,

    #[error("Only SELECT statements from \"todos\" table are supported")]
    UnsupportedStatement,

    #[error(transparent)]
    Backend(#[from] DomainError),
}
