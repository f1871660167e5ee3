//! Log Panel Component
//!
//! Collapsible view of the rolling logger's recent lines.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (lines, set_lines) = signal(Vec::<String>::new());
    let reload = move || set_lines.set(rolling_logger::recent_lines());

    view! {
        <details class="log-panel" on:toggle=move |_| reload()>
            <summary>"Recent activity"</summary>
            <button class="log-refresh" on:click=move |_| reload()>"Reload"</button>
            <pre class="log-lines">
                {move || lines.get().join("\n")}
            </pre>
        </details>
    }
}
