//! Onboarding Documents Panel
//!
//! Review queue filtered by status; approving flips the row immediately and
//! rolls back if the server refuses.

use collection_controller::{AlertChannel, Entry, FilterPatch, ItemId, Reconciliation};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::collection::use_collection;
use crate::commands::{onboarding_config, set_document_status_request, STATUS_FILTER};
use crate::components::Pager;
use crate::context::use_app_context;
use crate::models::{DocumentStatus, OnboardingDocument};

const ALL_STATUSES: &str = "all";

#[component]
pub fn OnboardingList() -> impl IntoView {
    let ctx = use_app_context();
    let documents = use_collection::<OnboardingDocument>(onboarding_config(ctx.page_size()));
    let view_state = documents.view;

    let on_status = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        let patch = match DocumentStatus::parse(&value) {
            Some(status) => FilterPatch::new().set(STATUS_FILTER, status.as_str()),
            None => FilterPatch::new().remove(STATUS_FILTER),
        };
        documents.set_filters(patch);
    };

    let set_status = move |id: ItemId, status: DocumentStatus| {
        let dispatcher = documents.dispatcher();
        let call = documents.call(set_document_status_request(&id, status));
        let alerts = ctx.alerts;
        spawn_local(async move {
            let result = dispatcher
                .mutate(
                    id,
                    move |document: &OnboardingDocument| OnboardingDocument {
                        status,
                        ..document.clone()
                    },
                    Reconciliation::Optimistic,
                    call,
                )
                .await;
            if result.is_ok() && status == DocumentStatus::Approved {
                alerts.notify_success("Document approved");
            }
        });
    };

    view! {
        <section class="panel onboarding-list">
            <header class="panel-header">
                <h2>"Onboarding documents"</h2>
                <select class="status-filter" on:change=on_status>
                    <option value=DocumentStatus::Pending.as_str() selected=true>"Pending"</option>
                    <option value=DocumentStatus::Approved.as_str()>"Approved"</option>
                    <option value=DocumentStatus::Rejected.as_str()>"Rejected"</option>
                    <option value=ALL_STATUSES>"All"</option>
                </select>
            </header>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Tenant"</th>
                        <th>"Document"</th>
                        <th>"Submitted"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || view_state.get().items
                        key=|entry| (entry.id.clone(), entry.item.status)
                        children={move |entry: Entry<OnboardingDocument>| {
                            let Entry { id, item } = entry;
                            let pending = item.status == DocumentStatus::Pending;
                            let approve_id = id.clone();
                            let reject_id = id;
                            view! {
                                <tr>
                                    <td>{item.tenant_name}</td>
                                    <td>{item.document_type}</td>
                                    <td>{item.submitted_at.format("%Y-%m-%d").to_string()}</td>
                                    <td>{item.status.as_str()}</td>
                                    <td class="row-actions">
                                        <Show when=move || pending>
                                            <button
                                                class="approve-btn"
                                                on:click={
                                                    let id = approve_id.clone();
                                                    move |_| set_status(id.clone(), DocumentStatus::Approved)
                                                }
                                            >
                                                "Approve"
                                            </button>
                                            <button
                                                class="reject-btn"
                                                on:click={
                                                    let id = reject_id.clone();
                                                    move |_| set_status(id.clone(), DocumentStatus::Rejected)
                                                }
                                            >
                                                "Reject"
                                            </button>
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }}
                    />
                </tbody>
            </table>

            <Show when=move || view_state.with(|v| v.items.is_empty() && !v.is_loading())>
                <p class="empty-state">"Nothing to review."</p>
            </Show>

            <Pager
                pagination=Signal::derive(move || view_state.get().pagination)
                loading=Signal::derive(move || view_state.get().is_loading())
                on_page=move |page: u32| documents.set_page(page)
            />
        </section>
    }
}
