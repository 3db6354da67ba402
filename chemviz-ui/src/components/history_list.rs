//! History List Component
//!
//! Recent datasets; clicking one makes it the active dataset.

use leptos::*;

use chemviz::view::history::{history_entries, history_title, HistoryEntry, EMPTY_MESSAGE};

use crate::state::use_global_state;

#[component]
pub fn HistoryList() -> impl IntoView {
    let state = use_global_state();
    let datasets = state.datasets;
    let current = state.current;

    view! {
        <section class="bg-gray-800 rounded-xl p-4">
            <h2 class="text-lg font-semibold mb-3">
                {move || datasets.with(|d| history_title(d))}
            </h2>

            {move || {
                let entries = datasets.with(|d| history_entries(d, current.get()));
                if entries.is_empty() {
                    view! { <p class="text-sm text-gray-400">{EMPTY_MESSAGE}</p> }.into_view()
                } else {
                    view! {
                        <ul class="space-y-2">
                            {entries
                                .into_iter()
                                .map(|entry| view! { <HistoryItem entry=entry /> })
                                .collect_view()}
                        </ul>
                    }.into_view()
                }
            }}
        </section>
    }
}

#[component]
fn HistoryItem(entry: HistoryEntry) -> impl IntoView {
    let state = use_global_state();
    let id = entry.id;

    let class = if entry.selected {
        "w-full text-left px-3 py-2 rounded-lg bg-primary-600 text-white"
    } else {
        "w-full text-left px-3 py-2 rounded-lg bg-gray-700 text-gray-200 hover:bg-gray-600 transition-colors"
    };

    view! {
        <li>
            <button on:click=move |_| state.select(id) class=class>
                <div class="font-medium truncate">{entry.filename}</div>
                <div class="text-xs text-gray-300">{entry.caption}</div>
            </button>
        </li>
    }
}
