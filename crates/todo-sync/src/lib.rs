//! Todo Sync Core
//!
//! Layered architecture:
//! - domain: Core entities, filters and errors
//! - backend: Hosted backend client abstraction and implementations
//! - auth: Session context and persistence, identity provider and token source
//! - sync: Optimistic todo list controller
//! - query: SQL playground translator, history and result formatting
//! - config: Firebase / Data Connect configuration

pub mod auth;
pub mod backend;
pub mod config;
pub mod domain;
pub mod query;
pub mod sync;

pub use auth::{
    AuthProvider, AuthService, FirebaseAuth, MemorySessionStore, SessionContext, SessionStore, SessionTokens,
    StoredSession, TokenSource,
};
pub use backend::{DataConnectClient, InMemoryBackend, TodoBackend};
pub use config::FirebaseConfig;
pub use domain::{AuthUser, DomainError, DomainResult, Todo, TodoFilter, TodoId, TodoStats, UserProfile};
pub use query::{format_result, QueryError, QueryHistory, QueryOutput, QueryShape, QueryTranslator};
pub use sync::{LoadStatus, SyncController, TodoListState, INITIAL_LOAD_DELAY};
