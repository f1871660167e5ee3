//! Global Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

/// Top-level dashboard sections
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Rents,
    Notifications,
    Onboarding,
    Vendors,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Rents,
        Section::Notifications,
        Section::Onboarding,
        Section::Vendors,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Rents => "Rent ledger",
            Section::Notifications => "Notifications",
            Section::Onboarding => "Onboarding",
            Section::Vendors => "Vendors",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// Global dashboard state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// Visible toasts, oldest first
    pub toasts: Vec<Toast>,
    pub next_toast_id: u32,
    pub active_section: Section,
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Push a toast and return its id
pub fn store_push_toast(store: &DashboardStore, kind: ToastKind, message: String) -> u32 {
    let id = store.next_toast_id().get_untracked();
    store.next_toast_id().set(id.wrapping_add(1));
    store.toasts().write().push(Toast { id, kind, message });
    id
}

/// Remove a toast by ID (no-op if already dismissed)
pub fn store_dismiss_toast(store: &DashboardStore, toast_id: u32) {
    store.toasts().write().retain(|toast| toast.id != toast_id);
}
