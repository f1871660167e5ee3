//! Rent Ledger Panel
//!
//! Paginated rent lines filtered by property, plus a form that records a
//! payment and re-fetches the ledger.

use chrono::NaiveDate;
use collection_controller::{AlertChannel, Entry, FilterPatch};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::collection::use_collection;
use crate::commands::{record_payment_request, rent_ledger_config, PROPERTY_FILTER};
use crate::components::Pager;
use crate::context::use_app_context;
use crate::models::{format_cents, parse_amount, PaymentDraft, RentEntry, RentStatus};

#[component]
pub fn RentLedger() -> impl IntoView {
    let ctx = use_app_context();
    let rents = use_collection::<RentEntry>(rent_ledger_config(ctx.page_size()));
    let view_state = rents.view;

    let (property, set_property) = signal(String::new());

    let on_filter = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let property_id = property.get().trim().to_string();
        let patch = if property_id.is_empty() {
            FilterPatch::new().remove(PROPERTY_FILTER)
        } else {
            FilterPatch::new().set(PROPERTY_FILTER, property_id)
        };
        rents.set_filters(patch);
    };

    view! {
        <section class="panel rent-ledger">
            <header class="panel-header">
                <h2>"Rent ledger"</h2>
                <form class="filter-form" on:submit=on_filter>
                    <input
                        type="text"
                        placeholder="Property ID"
                        prop:value=move || property.get()
                        on:input=move |ev| set_property.set(event_target_value(&ev))
                    />
                    <button type="submit">"Filter"</button>
                </form>
                <button class="refresh-btn" on:click=move |_| rents.refresh()>"Refresh"</button>
            </header>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Tenant"</th>
                        <th>"Property"</th>
                        <th>"Due"</th>
                        <th>"Amount"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || view_state.get().items
                        key=|entry| entry.id.clone()
                        children={move |entry: Entry<RentEntry>| {
                            let rent = entry.item;
                            let status_class = match rent.status {
                                RentStatus::Paid => "status status-paid",
                                RentStatus::Pending => "status status-pending",
                                RentStatus::Late => "status status-late",
                            };
                            view! {
                                <tr>
                                    <td>{rent.tenant_name}</td>
                                    <td>{rent.property_id}</td>
                                    <td>{rent.due_date.format("%b %e, %Y").to_string()}</td>
                                    <td class="amount">{format_cents(rent.amount_cents)}</td>
                                    <td><span class=status_class>{rent.status.label()}</span></td>
                                </tr>
                            }
                        }}
                    />
                </tbody>
            </table>

            <Show when=move || view_state.with(|v| v.items.is_empty() && !v.is_loading())>
                <p class="empty-state">"No rent lines for this filter."</p>
            </Show>

            <Pager
                pagination=Signal::derive(move || view_state.get().pagination)
                loading=Signal::derive(move || view_state.get().is_loading())
                on_page=move |page: u32| rents.set_page(page)
            />

            <RecordPaymentForm on_submit=move |draft: PaymentDraft| {
                let dispatcher = rents.dispatcher();
                let alerts = ctx.alerts;
                let call = record_payment_request(&draft).map(|request| rents.call(request));
                spawn_local(async move {
                    let outcome = match call {
                        Ok(call) => dispatcher.create(call).await,
                        Err(err) => Err(err),
                    };
                    match outcome {
                        Ok(()) => alerts.notify_success("Payment recorded"),
                        Err(err) => tracing::debug!(%err, "record payment not applied"),
                    }
                });
            } />
        </section>
    }
}

/// Inline form for a new payment line
#[component]
fn RecordPaymentForm(#[prop(into)] on_submit: Callback<PaymentDraft>) -> impl IntoView {
    let ctx = use_app_context();
    let (property_id, set_property_id) = signal(String::new());
    let (tenant, set_tenant) = signal(String::new());
    let (amount, set_amount) = signal(String::new());
    let (due_date, set_due_date) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(amount_cents) = parse_amount(&amount.get()) else {
            ctx.alerts.notify_error("Enter an amount like 1250.00");
            return;
        };
        let Ok(due_date) = NaiveDate::parse_from_str(&due_date.get(), "%Y-%m-%d") else {
            ctx.alerts.notify_error("Pick a due date");
            return;
        };
        let property_id = property_id.get().trim().to_string();
        let tenant_name = tenant.get().trim().to_string();
        if property_id.is_empty() || tenant_name.is_empty() {
            ctx.alerts.notify_error("Property and tenant are required");
            return;
        }
        on_submit.run(PaymentDraft {
            property_id,
            tenant_name,
            amount_cents,
            due_date,
        });
        set_amount.set(String::new());
    };

    view! {
        <form class="record-payment-form" on:submit=submit>
            <input
                type="text"
                placeholder="Property ID"
                prop:value=move || property_id.get()
                on:input=move |ev| set_property_id.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Tenant"
                prop:value=move || tenant.get()
                on:input=move |ev| set_tenant.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Amount"
                prop:value=move || amount.get()
                on:input=move |ev| set_amount.set(event_target_value(&ev))
            />
            <input
                type="date"
                prop:value=move || due_date.get()
                on:input=move |ev| set_due_date.set(event_target_value(&ev))
            />
            <button type="submit">"Record payment"</button>
        </form>
    }
}
