//! RentDesk Dashboard App
//!
//! Section tabs on top, one panel per resource, recent log lines below,
//! toasts in the corner.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::alerts::ToastAlerts;
use crate::components::{LogPanel, NotificationList, OnboardingList, RentLedger, ToastStack, VendorTable};
use crate::config::DashboardConfig;
use crate::context::AppContext;
use crate::store::{DashboardState, DashboardStateStoreFields, Section};

#[component]
pub fn App() -> impl IntoView {
    let config = DashboardConfig::from_build_env();
    tracing::info!(api = %config.api_base_url, page_size = config.page_size, "dashboard starting");

    let store = Store::new(DashboardState::default());
    provide_context(store);
    let alerts = ToastAlerts::new(store, config.toast_timeout_ms);
    provide_context(AppContext::new(config, alerts));

    let active = store.active_section();

    view! {
        <div class="app-layout">
            <nav class="section-tabs">
                {Section::ALL
                    .into_iter()
                    .map(|section| {
                        let tab_class = move || {
                            if active.get() == section { "section-tab active" } else { "section-tab" }
                        };
                        view! {
                            <button class=tab_class on:click=move |_| active.set(section)>
                                {section.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>

            <main class="main-content">
                <h1>"RentDesk"</h1>
                {move || match active.get() {
                    Section::Rents => view! { <RentLedger /> }.into_any(),
                    Section::Notifications => view! { <NotificationList /> }.into_any(),
                    Section::Onboarding => view! { <OnboardingList /> }.into_any(),
                    Section::Vendors => view! { <VendorTable /> }.into_any(),
                }}
                <LogPanel />
            </main>

            <ToastStack />
        </div>
    }
}
