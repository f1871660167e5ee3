//! Toast Stack Component
//!
//! Renders the alert channel's toasts in the corner of the screen.

use leptos::prelude::*;

use crate::store::{store_dismiss_toast, use_dashboard_store, DashboardStateStoreFields, ToastKind};

#[component]
pub fn ToastStack() -> impl IntoView {
    let store = use_dashboard_store();

    view! {
        <div class="toast-stack">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                    };
                    view! {
                        <div class=class role="status">
                            <span class="toast-message">{toast.message}</span>
                            <button
                                class="toast-close"
                                on:click=move |_| store_dismiss_toast(&store, id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
