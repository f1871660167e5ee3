//! Pager Component
//!
//! Previous/next controls for a paginated collection.

use collection_controller::Pagination;
use leptos::prelude::*;

#[component]
pub fn Pager(
    #[prop(into)] pagination: Signal<Pagination>,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] on_page: Callback<u32>,
) -> impl IntoView {
    let go = move |delta: i64| {
        let current = pagination.get_untracked();
        let target = (i64::from(current.page) + delta).clamp(1, i64::from(current.last_page()));
        on_page.run(target as u32);
    };

    view! {
        <div class="pager">
            <button
                class="pager-btn"
                disabled=move || !pagination.get().has_previous()
                on:click=move |_| go(-1)
            >
                "‹ Prev"
            </button>
            <span class="pager-status">
                {move || {
                    let p = pagination.get();
                    format!("Page {} of {} · {} total", p.page, p.last_page(), p.total_items)
                }}
            </span>
            <button
                class="pager-btn"
                disabled=move || !pagination.get().has_next()
                on:click=move |_| go(1)
            >
                "Next ›"
            </button>
            <Show when=move || loading.get()>
                <span class="pager-spinner">"Loading…"</span>
            </Show>
        </div>
    }
}
