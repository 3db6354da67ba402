//! Header Component
//!
//! Title bar with the login link or the logout button.

use leptos::*;
use leptos_router::*;

use crate::state::use_global_state;

/// Dashboard header
#[component]
pub fn Header() -> impl IntoView {
    let state = use_global_state();
    let authenticated = state.authenticated;

    let on_logout = move |_: web_sys::MouseEvent| state.sign_out();

    view! {
        <header class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"⚗"</span>
                        <span class="text-xl font-bold text-white">
                            "Chemical Equipment Parameter Visualizer"
                        </span>
                    </A>

                    {move || {
                        if authenticated.get() {
                            view! {
                                <button
                                    on:click=on_logout.clone()
                                    class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                                >
                                    "Logout"
                                </button>
                            }.into_view()
                        } else {
                            view! {
                                <A
                                    href="/login"
                                    class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
                                    active_class="bg-gray-700 text-white"
                                >
                                    "Login"
                                </A>
                            }.into_view()
                        }
                    }}
                </div>
            </div>
        </header>
    }
}
