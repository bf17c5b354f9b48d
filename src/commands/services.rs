//! Hosted Services
//!
//! One session, one identity provider and one Data Connect client shared by
//! the sync controller, the auth flows and the SQL playground.

use std::sync::Arc;

use super::storage::LocalSessionStore;
use todo_sync::{
    AuthProvider, AuthService, DataConnectClient, DomainResult, FirebaseAuth, FirebaseConfig,
    QueryTranslator, SessionContext, SessionTokens, SyncController, TodoBackend, TokenSource,
};

/// Services used by the components
#[derive(Clone)]
pub struct Services {
    pub session: SessionContext,
    pub controller: SyncController<dyn TodoBackend>,
    pub auth: AuthService<dyn AuthProvider, dyn TodoBackend>,
    pub translator: QueryTranslator<dyn TodoBackend>,
}

/// Values baked in at build time
fn build_var(name: &str) -> Option<String> {
    let value = match name {
        "FIREBASE_API_KEY" => option_env!("FIREBASE_API_KEY"),
        "FIREBASE_AUTH_DOMAIN" => option_env!("FIREBASE_AUTH_DOMAIN"),
        "FIREBASE_PROJECT_ID" => option_env!("FIREBASE_PROJECT_ID"),
        "FIREBASE_STORAGE_BUCKET" => option_env!("FIREBASE_STORAGE_BUCKET"),
        "FIREBASE_MESSAGING_SENDER_ID" => option_env!("FIREBASE_MESSAGING_SENDER_ID"),
        "FIREBASE_APP_ID" => option_env!("FIREBASE_APP_ID"),
        "DATACONNECT_SERVICE" => option_env!("DATACONNECT_SERVICE"),
        "DATACONNECT_LOCATION" => option_env!("DATACONNECT_LOCATION"),
        "DATACONNECT_CONNECTOR" => option_env!("DATACONNECT_CONNECTOR"),
        "FIREBASE_AUTH_EMULATOR_HOST" => option_env!("FIREBASE_AUTH_EMULATOR_HOST"),
        _ => None,
    };
    value.map(str::to_string)
}

/// Build every service from the build-time configuration
pub fn connect() -> DomainResult<Services> {
    let config = FirebaseConfig::from_lookup(build_var)?;
    tracing::info!(
        project = %config.project_id,
        service = %config.data_connect.service,
        "Connecting to Data Connect"
    );

    let session = SessionContext::with_store(Arc::new(LocalSessionStore));
    let provider: Arc<dyn AuthProvider> = Arc::new(FirebaseAuth::new(&config));
    let tokens: Arc<dyn TokenSource> = Arc::new(SessionTokens::new(session.clone(), provider.clone()));
    let backend: Arc<dyn TodoBackend> = Arc::new(DataConnectClient::new(config, tokens));

    Ok(Services {
        controller: SyncController::new(backend.clone(), session.clone()),
        auth: AuthService::new(provider, backend.clone(), session.clone()),
        translator: QueryTranslator::new(backend),
        session,
    })
}
