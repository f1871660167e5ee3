//! Toast Alerts
//!
//! `AlertChannel` backed by the dashboard store. Each toast removes itself
//! after the configured timeout.

use collection_controller::AlertChannel;
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;

use crate::store::{store_dismiss_toast, store_push_toast, DashboardStore, ToastKind};

#[derive(Clone, Copy)]
pub struct ToastAlerts {
    store: DashboardStore,
    timeout_ms: u32,
}

impl ToastAlerts {
    pub fn new(store: DashboardStore, timeout_ms: u32) -> Self {
        Self { store, timeout_ms }
    }

    fn push(&self, kind: ToastKind, message: &str) {
        let id = store_push_toast(&self.store, kind, message.to_owned());
        let store = self.store;
        let timeout_ms = self.timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout_ms).await;
            store_dismiss_toast(&store, id);
        });
    }
}

impl AlertChannel for ToastAlerts {
    fn notify_success(&self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn notify_error(&self, message: &str) {
        tracing::warn!(%message, "error toast");
        self.push(ToastKind::Error, message);
    }
}
