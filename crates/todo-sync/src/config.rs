//! Firebase / Data Connect Configuration
//!
//! Built from a named-variable lookup; the browser build feeds it
//! compile-time `option_env!` values.

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";
const DATA_CONNECT_URL: &str = "https://firebasedataconnect.googleapis.com";

/// Variables that must be present for the app to start
pub const REQUIRED_VARS: [&str; 6] = [
    "FIREBASE_API_KEY",
    "FIREBASE_AUTH_DOMAIN",
    "FIREBASE_PROJECT_ID",
    "FIREBASE_STORAGE_BUCKET",
    "FIREBASE_MESSAGING_SENDER_ID",
    "FIREBASE_APP_ID",
];

/// Data Connect service coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConnectConfig {
    pub service: String,
    pub location: String,
    pub connector: String,
}

impl Default for DataConnectConfig {
    fn default() -> Self {
        Self {
            service: "todo-service".to_string(),
            location: "us-central1".to_string(),
            connector: "default".to_string(),
        }
    }
}

/// Base URLs of the hosted services (overridable for emulators and tests)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub identity_toolkit: String,
    pub secure_token: String,
    pub data_connect: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            identity_toolkit: IDENTITY_TOOLKIT_URL.to_string(),
            secure_token: SECURE_TOKEN_URL.to_string(),
            data_connect: DATA_CONNECT_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point auth endpoints at a local auth emulator (`host:port`)
    pub fn with_auth_emulator(mut self, host: &str) -> Self {
        let host = host.trim_end_matches('/');
        self.identity_toolkit = format!("http://{}/identitytoolkit.googleapis.com", host);
        self.secure_token = format!("http://{}/securetoken.googleapis.com", host);
        self
    }

    /// Point every endpoint at one base URL (mock servers)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            identity_toolkit: base.clone(),
            secure_token: base.clone(),
            data_connect: base,
        }
    }
}

/// Firebase web app configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(default)]
    pub data_connect: DataConnectConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl FirebaseConfig {
    /// Build from a variable lookup; all missing required variables are reported together
    pub fn from_lookup<F>(mut lookup: F) -> DomainResult<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut values = Vec::with_capacity(REQUIRED_VARS.len());
        let mut missing = Vec::new();
        for name in REQUIRED_VARS {
            match get(name) {
                Some(value) => values.push(value),
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(DomainError::Config(format!(
                "Missing required environment variables: {}. Please check your build environment.",
                missing.join(", ")
            )));
        }

        let defaults = DataConnectConfig::default();
        let data_connect = DataConnectConfig {
            service: get("DATACONNECT_SERVICE").unwrap_or(defaults.service),
            location: get("DATACONNECT_LOCATION").unwrap_or(defaults.location),
            connector: get("DATACONNECT_CONNECTOR").unwrap_or(defaults.connector),
        };

        let mut endpoints = Endpoints::default();
        if let Some(host) = get("FIREBASE_AUTH_EMULATOR_HOST") {
            endpoints = endpoints.with_auth_emulator(&host);
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            api_key: next(),
            auth_domain: next(),
            project_id: next(),
            storage_bucket: next(),
            messaging_sender_id: next(),
            app_id: next(),
            data_connect,
            endpoints,
        })
    }

    /// Full URL of a Data Connect connector action (`executeQuery` / `executeMutation`)
    pub fn connector_url(&self, action: &str) -> String {
        format!(
            "{}/v1beta/projects/{}/locations/{}/services/{}/connectors/{}:{}",
            self.endpoints.data_connect.trim_end_matches('/'),
            self.project_id,
            self.data_connect.location,
            self.data_connect.service,
            self.data_connect.connector,
            action
        )
    }
}
