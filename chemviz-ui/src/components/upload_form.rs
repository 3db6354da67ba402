//! Upload Form Component
//!
//! CSV picker and submit button. The button stays disabled while an upload
//! is in flight, so at most one runs at a time.

use leptos::*;

use chemviz::view::status::{
    upload_success_message, StatusMessage, NO_FILE_MESSAGE, UPLOAD_FALLBACK,
};

use crate::api;
use crate::components::loading::InlineLoading;
use crate::state::use_global_state;

#[component]
pub fn UploadForm() -> impl IntoView {
    let state = use_global_state();

    let file_input = create_node_ref::<html::Input>();
    let (uploading, set_uploading) = create_signal(false);
    let (status, set_status) = create_signal(None::<StatusMessage>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() {
            return;
        }

        let file = file_input
            .get_untracked()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            set_status.set(Some(StatusMessage::error(NO_FILE_MESSAGE)));
            return;
        };

        set_uploading.set(true);
        set_status.set(None);

        let state = state.clone();
        spawn_local(async move {
            match api::upload(&state.session, &file).await {
                Ok(response) => {
                    set_status.set(Some(StatusMessage::success(upload_success_message(
                        &response,
                    ))));
                    if let Some(input) = file_input.get_untracked() {
                        input.set_value("");
                    }
                    state.on_upload_success(response.dataset_id);
                }
                Err(e) => {
                    set_status.set(Some(StatusMessage::error(e.user_message(UPLOAD_FALLBACK))));
                }
            }
            set_uploading.set(false);
        });
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-4">
            <h2 class="text-lg font-semibold mb-3">"Upload CSV"</h2>

            <form on:submit=on_submit class="space-y-3">
                <input
                    type="file"
                    accept=".csv"
                    node_ref=file_input
                    class="block w-full text-sm text-gray-300
                           file:mr-3 file:py-2 file:px-4 file:rounded-lg file:border-0
                           file:bg-gray-700 file:text-white hover:file:bg-gray-600"
                />

                <button
                    type="submit"
                    disabled=move || uploading.get()
                    class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg py-2 font-semibold
                           transition-colors flex items-center justify-center space-x-2"
                >
                    {move || if uploading.get() {
                        view! {
                            <InlineLoading />
                            <span>"Uploading..."</span>
                        }.into_view()
                    } else {
                        view! { <span>"Upload"</span> }.into_view()
                    }}
                </button>
            </form>

            {move || status.get().map(|message| {
                let class = if message.is_error {
                    "mt-3 text-sm text-red-400"
                } else {
                    "mt-3 text-sm text-green-400"
                };
                view! { <p class=class>{message.text}</p> }
            })}
        </section>
    }
}
