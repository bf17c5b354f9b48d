//! Application Context
//!
//! Shared services provided via Leptos Context API.

use leptos::prelude::*;

use crate::commands::Services;
use crate::store::{store_set_error, AppStateStoreFields, AppStore};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Backend services (not `Send`, so kept in local storage)
    services: StoredValue<Services, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(services: Services, store: AppStore) -> Self {
        Self {
            services: StoredValue::new_local(services),
            store,
        }
    }

    pub fn services(&self) -> Services {
        self.services.get_value()
    }

    /// Surface a message in the error banner
    pub fn report(&self, message: impl Into<String>) {
        store_set_error(&self.store, message);
    }

    /// Clear both local and controller errors
    pub fn dismiss_error(&self) {
        self.store.error().set(None);
        self.services.with_value(|s| s.controller.dismiss_error());
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
