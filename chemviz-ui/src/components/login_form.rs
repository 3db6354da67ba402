//! Login Form Component
//!
//! Login and registration share one form; a link switches the mode.

use leptos::*;
use leptos_router::*;

use chemviz::view::status::AUTH_FALLBACK;

use crate::api;
use crate::state::use_global_state;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

impl Mode {
    fn title(self) -> &'static str {
        match self {
            Mode::Login => "Login",
            Mode::Register => "Register",
        }
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (mode, set_mode) = create_signal(Mode::Login);
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<String>);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error.set(None);
        set_submitting.set(true);

        let state = state.clone();
        let navigate = navigate.clone();
        let (user, pass, mail) = (username.get(), password.get(), email.get());
        let current_mode = mode.get();

        spawn_local(async move {
            let result = match current_mode {
                Mode::Login => api::login(&state.session, &user, &pass).await,
                Mode::Register => {
                    let mail = Some(mail.as_str()).filter(|m| !m.is_empty());
                    api::register(&state.session, &user, &pass, mail).await
                }
            };

            match result {
                Ok(tokens) => match state.sign_in(&tokens) {
                    Ok(()) => navigate("/", Default::default()),
                    Err(e) => set_error.set(Some(e.to_string())),
                },
                Err(e) => set_error.set(Some(e.user_message(AUTH_FALLBACK))),
            }
            set_submitting.set(false);
        });
    };

    let input_class = "w-full bg-gray-700 rounded-lg px-4 py-3 text-white \
                       border border-gray-600 focus:border-primary-500 focus:outline-none";

    view! {
        <form on:submit=on_submit class="max-w-md mx-auto bg-gray-800 rounded-xl p-6 space-y-4">
            <h2 class="text-2xl font-bold">{move || mode.get().title()}</h2>

            {move || error.get().map(|message| view! {
                <div class="bg-red-600/20 border border-red-600 text-red-300 rounded-lg px-4 py-2 text-sm">
                    {message}
                </div>
            })}

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Username"</label>
                <input
                    type="text"
                    required
                    class=input_class
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
            </div>

            <div>
                <label class="block text-sm text-gray-400 mb-2">"Password"</label>
                <input
                    type="password"
                    required
                    class=input_class
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </div>

            <Show when=move || mode.get() == Mode::Register>
                <div>
                    <label class="block text-sm text-gray-400 mb-2">"Email (optional)"</label>
                    <input
                        type="email"
                        class=input_class
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
            </Show>

            <button
                type="submit"
                disabled=move || submitting.get()
                class="w-full bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg py-3 font-semibold transition-colors"
            >
                {move || if submitting.get() { "Please wait..." } else { mode.get().title() }}
            </button>

            <p class="text-sm text-gray-400 text-center">
                {move || match mode.get() {
                    Mode::Login => view! {
                        "Don't have an account? "
                        <a class="text-primary-400 cursor-pointer" on:click=move |_| set_mode.set(Mode::Register)>
                            "Register"
                        </a>
                    }.into_view(),
                    Mode::Register => view! {
                        "Already have an account? "
                        <a class="text-primary-400 cursor-pointer" on:click=move |_| set_mode.set(Mode::Login)>
                            "Login"
                        </a>
                    }.into_view(),
                }}
            </p>
        </form>
    }
}
