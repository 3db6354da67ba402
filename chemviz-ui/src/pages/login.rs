//! Login Page

use leptos::*;

use crate::components::LoginForm;

#[component]
pub fn Login() -> impl IntoView {
    view! {
        <div class="py-8">
            <LoginForm />
        </div>
    }
}
