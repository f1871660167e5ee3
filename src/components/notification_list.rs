//! Notification List Panel
//!
//! Mark-as-read is applied optimistically; delete waits for the server and
//! re-fetches the page.

use collection_controller::{Entry, ItemId, Reconciliation};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::collection::use_collection;
use crate::commands::{delete_notification_request, mark_read_request, notifications_config};
use crate::components::{DeleteConfirmButton, Pager};
use crate::context::use_app_context;
use crate::models::Notification;

#[component]
pub fn NotificationList() -> impl IntoView {
    let ctx = use_app_context();
    let notifications = use_collection::<Notification>(notifications_config(ctx.page_size()));
    let view_state = notifications.view;

    let mark_read = move |id: ItemId| {
        let dispatcher = notifications.dispatcher();
        let call = notifications.call(mark_read_request(&id));
        spawn_local(async move {
            let result = dispatcher
                .mutate(
                    id,
                    |notification: &Notification| Notification {
                        read: true,
                        ..notification.clone()
                    },
                    Reconciliation::Optimistic,
                    call,
                )
                .await;
            if let Err(err) = result {
                tracing::debug!(%err, "mark as read rolled back");
            }
        });
    };

    let delete = move |id: ItemId| {
        let dispatcher = notifications.dispatcher();
        let call = notifications.call(delete_notification_request(&id));
        spawn_local(async move {
            if let Err(err) = dispatcher.remove(id, Reconciliation::RefetchOnSuccess, call).await {
                tracing::debug!(%err, "notification delete not applied");
            }
        });
    };

    let unread = move || {
        view_state.with(|v| v.items.iter().filter(|entry| !entry.item.read).count())
    };

    view! {
        <section class="panel notification-list">
            <header class="panel-header">
                <h2>"Notifications"</h2>
                <span class="badge">{move || format!("{} unread on this page", unread())}</span>
            </header>

            <ul class="notification-items">
                <For
                    each=move || view_state.get().items
                    key=|entry| (entry.id.clone(), entry.item.read)
                    children={move |entry: Entry<Notification>| {
                        let Entry { id, item } = entry;
                        let read_id = id.clone();
                        let delete_id = id;
                        let read = item.read;
                        let row_class = if read { "notification read" } else { "notification unread" };
                        view! {
                            <li class=row_class>
                                <div class="notification-body">
                                    <strong>{item.title}</strong>
                                    <p>{item.body}</p>
                                    <time>{item.created_at.format("%Y-%m-%d %H:%M").to_string()}</time>
                                </div>
                                <div class="notification-actions">
                                    <Show when=move || !read>
                                        <button
                                            class="mark-read-btn"
                                            on:click={
                                                let read_id = read_id.clone();
                                                move |_| mark_read(read_id.clone())
                                            }
                                        >
                                            "Mark read"
                                        </button>
                                    </Show>
                                    <DeleteConfirmButton on_confirm=move |_: ()| delete(delete_id.clone()) />
                                </div>
                            </li>
                        }
                    }}
                />
            </ul>

            <Show when=move || view_state.with(|v| v.items.is_empty() && !v.is_loading())>
                <p class="empty-state">"You're all caught up."</p>
            </Show>

            <Pager
                pagination=Signal::derive(move || view_state.get().pagination)
                loading=Signal::derive(move || view_state.get().is_loading())
                on_page=move |page: u32| notifications.set_page(page)
            />
        </section>
    }
}
