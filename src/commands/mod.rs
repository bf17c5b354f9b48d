//! Service Wiring
//!
//! Builds the hosted-backend services from the compile-time Firebase
//! configuration, persists the session in the browser and bridges the
//! page-provided Google sign-in.

mod google;
mod services;
mod storage;

pub use google::request_google_id_token;
pub use services::{connect, Services};
