//! Data Connect Client
//!
//! Calls the generated connector operations over the Data Connect REST API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::traits::TodoBackend;
use crate::auth::TokenSource;
use crate::config::FirebaseConfig;
use crate::domain::{DomainError, DomainResult, Todo, TodoId, UserProfile};

/// Header carrying the user's ID token
const AUTH_TOKEN_HEADER: &str = "X-Firebase-Auth-Token";

/// A connector operation: GraphQL operation name plus the label used in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub label: &'static str,
    kind: OperationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationKind {
    Query,
    Mutation,
}

impl Operation {
    pub const GET_MY_TODOS: Operation = Operation::query("GetMyTodos", "getMyTodos");
    pub const GET_TODO_BY_ID: Operation = Operation::query("GetTodoById", "getTodoById");
    pub const ADD_TODO: Operation = Operation::mutation("AddTodo", "addTodo");
    pub const TOGGLE_TODO: Operation = Operation::mutation("ToggleTodoCompletion", "toggleTodoCompletion");
    pub const UPDATE_TODO_TEXT: Operation = Operation::mutation("UpdateTodoText", "updateTodoText");
    pub const DELETE_TODO: Operation = Operation::mutation("DeleteTodo", "deleteTodo");
    pub const UPSERT_USER: Operation = Operation::mutation("UpsertUser", "upsertUser");

    const fn query(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: OperationKind::Query }
    }

    const fn mutation(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: OperationKind::Mutation }
    }

    fn action(&self) -> &'static str {
        match self.kind {
            OperationKind::Query => "executeQuery",
            OperationKind::Mutation => "executeMutation",
        }
    }
}

// ========================
// Wire Types
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a, V: Serialize> {
    operation_name: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct ExecuteResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct MyTodosData {
    todos: Option<Vec<Todo>>,
}

#[derive(Deserialize)]
struct TodoByIdData {
    todo: Option<Todo>,
}

#[derive(Deserialize)]
struct TodoKey {
    id: TodoId,
}

#[derive(Deserialize)]
struct AddTodoData {
    todo_insert: TodoKey,
}

// ========================
// Client
// ========================

/// Data Connect backend for the signed-in user
pub struct DataConnectClient {
    http: Client,
    config: FirebaseConfig,
    tokens: Arc<dyn TokenSource>,
}

impl DataConnectClient {
    pub fn new(config: FirebaseConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self::with_client(Client::new(), config, tokens)
    }

    pub fn with_client(http: Client, config: FirebaseConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self { http, config, tokens }
    }

    /// Execute one connector operation and return its `data` payload
    #[tracing::instrument(skip_all, fields(operation = op.name))]
    async fn execute<V, D>(&self, op: Operation, variables: &V, force_refresh: bool) -> DomainResult<Option<D>>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let token = self.tokens.bearer_token(force_refresh).await?;

        let mut request = self
            .http
            .post(self.config.connector_url(op.action()))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&ExecuteRequest { operation_name: op.name, variables });
        if let Some(token) = token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::backend(op.label, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            tracing::warn!(status = status.as_u16(), "Data Connect call rejected: {}", message);
            return Err(DomainError::backend(op.label, message));
        }

        let body: ExecuteResponse<D> = response
            .json()
            .await
            .map_err(|e| DomainError::backend(op.label, e.to_string()))?;

        if !body.errors.is_empty() {
            let message = body
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!("Data Connect returned errors: {}", message);
            return Err(DomainError::backend(op.label, message));
        }

        tracing::debug!("Data Connect call succeeded");
        Ok(body.data)
    }
}

#[async_trait(?Send)]
impl TodoBackend for DataConnectClient {
    async fn list_my_todos(&self) -> DomainResult<Vec<Todo>> {
        let data: Option<MyTodosData> = self.execute(Operation::GET_MY_TODOS, &json!({}), false).await?;
        Ok(data.and_then(|d| d.todos).unwrap_or_default())
    }

    async fn get_todo(&self, id: &str) -> DomainResult<Option<Todo>> {
        let data: Option<TodoByIdData> = self
            .execute(Operation::GET_TODO_BY_ID, &json!({ "id": id }), false)
            .await?;
        Ok(data.and_then(|d| d.todo))
    }

    async fn add_todo(&self, text: &str) -> DomainResult<TodoId> {
        // Fresh token: the insert is authorized against auth.uid
        let data: Option<AddTodoData> = self
            .execute(Operation::ADD_TODO, &json!({ "text": text }), true)
            .await?;
        data.map(|d| d.todo_insert.id)
            .ok_or_else(|| DomainError::backend(Operation::ADD_TODO.label, "no todo was created"))
    }

    async fn toggle_todo(&self, id: &str, completed: bool) -> DomainResult<()> {
        let _: Option<IgnoredAny> = self
            .execute(Operation::TOGGLE_TODO, &json!({ "id": id, "completed": completed }), false)
            .await?;
        Ok(())
    }

    async fn update_todo_text(&self, id: &str, text: &str) -> DomainResult<()> {
        let _: Option<IgnoredAny> = self
            .execute(Operation::UPDATE_TODO_TEXT, &json!({ "id": id, "text": text }), false)
            .await?;
        Ok(())
    }

    async fn delete_todo(&self, id: &str) -> DomainResult<()> {
        let _: Option<IgnoredAny> = self
            .execute(Operation::DELETE_TODO, &json!({ "id": id }), false)
            .await?;
        Ok(())
    }

    async fn upsert_user(&self, profile: &UserProfile) -> DomainResult<()> {
        let _: Option<IgnoredAny> = self.execute(Operation::UPSERT_USER, profile, false).await?;
        Ok(())
    }
}
