//! Example queries offered by the SQL editor.

/// A named example query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleQuery {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const EXAMPLE_QUERIES: &[ExampleQuery] = &[
    ExampleQuery {
        name: "Get all todos",
        sql: "SELECT * FROM todos",
    },
    ExampleQuery {
        name: "Get completed todos",
        sql: "SELECT id, text, createdAt FROM todos WHERE completed = true",
    },
    ExampleQuery {
        name: "Get active todos",
        sql: "SELECT id, text, createdAt FROM todos WHERE completed = false",
    },
    ExampleQuery {
        name: "Count todos by status",
        sql: "SELECT completed, COUNT(*) as count FROM todos GROUP BY completed",
    },
    ExampleQuery {
        name: "Get todo by ID",
        sql: "SELECT * FROM todos WHERE id = \"YOUR_TODO_ID_HERE\"",
    },
];
