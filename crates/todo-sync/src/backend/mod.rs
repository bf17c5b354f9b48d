//! Backend Layer
//!
//! Hosted backend abstraction and its implementations.

mod dataconnect;
mod memory;
mod traits;

pub use dataconnect::{DataConnectClient, Operation};
pub use memory::{BackendOp, InMemoryBackend};
pub use traits::TodoBackend;
