//! Application Context
//!
//! Shared handles provided via Leptos Context API: build-time config, the
//! alert channel, and the pieces every collection controller is built from.

use std::rc::Rc;

use collection_controller::{CollectionConfig, CollectionController, Transport};
use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use leptos::prelude::*;
use serde::de::DeserializeOwned;

use crate::alerts::ToastAlerts;
use crate::commands::HttpTransport;
use crate::config::DashboardConfig;

/// Runs controller tasks on the browser event loop
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        leptos::task::spawn_local(future);
        Ok(())
    }
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<DashboardConfig>,
    pub alerts: ToastAlerts,
}

impl AppContext {
    pub fn new(config: DashboardConfig, alerts: ToastAlerts) -> Self {
        Self {
            config: StoredValue::new(config),
            alerts,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.config.with_value(|config| config.page_size)
    }

    /// Fresh HTTP transport; not shared across threads so never stored in context
    pub fn transport(&self) -> Rc<dyn Transport> {
        let base_url = self.config.with_value(|config| config.api_base_url.clone());
        Rc::new(HttpTransport::new(base_url))
    }

    pub fn controller<T>(&self, config: CollectionConfig, transport: Rc<dyn Transport>) -> CollectionController<T>
    where
        T: DeserializeOwned + Clone + 'static,
    {
        CollectionController::new(config, transport, Rc::new(self.alerts), Rc::new(BrowserSpawner))
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
