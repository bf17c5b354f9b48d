//! Auth Layer
//!
//! Session context and its persistence, identity provider client and the
//! token source used by the backend client.

mod firebase;
mod persist;
mod provider;
mod service;
mod session;

pub use firebase::{FirebaseAuth, GOOGLE_PROVIDER_ID};
pub use persist::{MemorySessionStore, SessionStore, StoredSession};
pub use provider::{AuthProvider, SessionTokens, TokenSource};
pub use service::AuthService;
pub use session::SessionContext;
