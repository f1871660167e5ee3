//! Vendor Directory Panel
//!
//! Free-text search over vendors; removal drops the row at once and puts it
//! back in place if the server refuses.

use collection_controller::{AlertChannel, Entry, ItemId, Reconciliation};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::collection::use_collection;
use crate::commands::{remove_vendor_request, vendors_config};
use crate::components::{DeleteConfirmButton, Pager};
use crate::context::use_app_context;
use crate::models::Vendor;

#[component]
pub fn VendorTable() -> impl IntoView {
    let ctx = use_app_context();
    let vendors = use_collection::<Vendor>(vendors_config(ctx.page_size()));
    let view_state = vendors.view;
    let (query, set_query) = signal(String::new());

    let remove = move |id: ItemId, name: String| {
        let dispatcher = vendors.dispatcher();
        let call = vendors.call(remove_vendor_request(&id));
        let alerts = ctx.alerts;
        spawn_local(async move {
            if dispatcher.remove(id, Reconciliation::Optimistic, call).await.is_ok() {
                alerts.notify_success(&format!("Removed {name}"));
            }
        });
    };

    view! {
        <section class="panel vendor-table">
            <header class="panel-header">
                <h2>"Vendors"</h2>
                <form
                    class="search-form"
                    on:submit=move |ev: web_sys::SubmitEvent| {
                        ev.prevent_default();
                        vendors.set_search(&query.get());
                    }
                >
                    <input
                        type="search"
                        placeholder="Search vendors"
                        prop:value=move || query.get()
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                    />
                    <button type="submit">"Search"</button>
                </form>
            </header>

            <table class="data-table">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Trade"</th>
                        <th>"Phone"</th>
                        <th>"Email"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || view_state.get().items
                        key=|entry| entry.id.clone()
                        children={move |entry: Entry<Vendor>| {
                            let Entry { id, item } = entry;
                            let name = item.name.clone();
                            view! {
                                <tr>
                                    <td>{item.name}</td>
                                    <td>{item.trade}</td>
                                    <td>{item.phone.unwrap_or_default()}</td>
                                    <td>{item.email.unwrap_or_default()}</td>
                                    <td class="row-actions">
                                        <DeleteConfirmButton
                                            on_confirm=move |_: ()| remove(id.clone(), name.clone())
                                        />
                                    </td>
                                </tr>
                            }
                        }}
                    />
                </tbody>
            </table>

            <Show when=move || view_state.with(|v| v.items.is_empty() && !v.is_loading())>
                <p class="empty-state">"No vendors match."</p>
            </Show>

            <Pager
                pagination=Signal::derive(move || view_state.get().pagination)
                loading=Signal::derive(move || view_state.get().is_loading())
                on_page=move |page: u32| vendors.set_page(page)
            />
        </section>
    }
}
