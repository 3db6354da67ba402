//! Summary Stats Component
//!
//! Statistic cards for the active dataset and the PDF report button.

use leptos::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use chemviz::api::endpoints::report_filename;
use chemviz::model::DatasetSummary;
use chemviz::view::status::REPORT_FALLBACK;
use chemviz::view::SummaryView;

use crate::api;
use crate::components::loading::CardSkeleton;
use crate::state::global::log_degraded;
use crate::state::use_global_state;

#[component]
pub fn SummaryStats() -> impl IntoView {
    let state = use_global_state();
    let current = state.current;

    let fetch_session = state.session.clone();
    let summary = create_local_resource(
        move || current.get(),
        move |id| {
            let session = fetch_session.clone();
            async move {
                let id = id?;
                match api::get_dataset_summary(&session, id).await {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        log_degraded("summary", id, &e.to_string());
                        None
                    }
                }
            }
        },
    );

    let (downloading, set_downloading) = create_signal(false);
    let download_session = state.session.clone();
    let on_download = move |_: web_sys::MouseEvent| {
        let Some(id) = current.get_untracked() else {
            return;
        };
        if downloading.get_untracked() {
            return;
        }
        set_downloading.set(true);

        let session = download_session.clone();
        spawn_local(async move {
            match api::generate_pdf(&session, id).await {
                Ok(bytes) => {
                    if let Err(e) = save_download(&bytes, &report_filename(id)) {
                        web_sys::console::error_1(&e);
                        alert(REPORT_FALLBACK);
                    }
                }
                Err(e) => alert(&e.user_message(REPORT_FALLBACK)),
            }
            set_downloading.set(false);
        });
    };

    view! {
        <Suspense fallback=move || view! { <CardSkeleton /> }>
            {move || summary.get().flatten().map(|summary| view! {
                <SummaryCards
                    summary=summary
                    downloading=downloading
                    on_download=on_download.clone()
                />
            })}
        </Suspense>
    }
}

#[component]
fn SummaryCards<F>(
    summary: DatasetSummary,
    downloading: ReadSignal<bool>,
    on_download: F,
) -> impl IntoView
where
    F: Fn(web_sys::MouseEvent) + 'static,
{
    let stats = SummaryView::from(&summary);

    view! {
        <section class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Summary Statistics"</h2>
                <button
                    on:click=on_download
                    disabled=move || downloading.get()
                    class="px-4 py-2 bg-red-600 hover:bg-red-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg font-semibold text-sm transition-colors"
                >
                    {move || if downloading.get() { "Generating..." } else { "Download PDF Report" }}
                </button>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {stats.cards.into_iter().map(|card| view! {
                    <div class="bg-gray-800 rounded-lg p-4">
                        <div class="text-xs uppercase tracking-wide text-gray-400 mb-1">{card.label}</div>
                        <div class="text-2xl font-bold">{card.value}</div>
                    </div>
                }).collect_view()}
            </div>

            {(!stats.ranges.is_empty()).then(|| view! {
                <div class="bg-gray-800 rounded-lg p-4 text-sm space-y-1">
                    {stats.ranges.iter().map(|range| view! {
                        <div class="flex justify-between">
                            <span class="text-gray-400">{range.label}</span>
                            <span>{range.text()}</span>
                        </div>
                    }).collect_view()}
                </div>
            })}

            {(!stats.distribution.is_empty()).then(|| view! {
                <div class="flex flex-wrap gap-2 text-sm">
                    {stats.distribution.iter().map(|(kind, count)| view! {
                        <span class="px-3 py-1 rounded-full bg-gray-700">
                            {format!("{}: {}", kind, count)}
                        </span>
                    }).collect_view()}
                </div>
            })}
        </section>
    }
}

/// Offer bytes as a file download through a transient object URL
fn save_download(bytes: &[u8], filename: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let url = Url::create_object_url_with_blob(&blob)?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Url::revoke_object_url(&url)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
