//! App Root Component
//!
//! Shell layout with routing and the global state provider.

use leptos::*;
use leptos_router::*;

use chemviz::routes::Route as DashboardRoute;

use crate::components::{Header, HistoryList, UploadForm};
use crate::pages::{Dashboard, Login};
use crate::state::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    // Load the dataset list on mount and again whenever the session changes
    let state = use_global_state();
    let authenticated = state.authenticated;
    create_effect(move |_| {
        let _ = authenticated.get();
        state.refresh_datasets();
    });

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                <Header />

                <div class="flex-1 container mx-auto px-4 py-8 flex flex-col lg:flex-row gap-6">
                    <aside class="lg:w-80 shrink-0 space-y-6">
                        <UploadForm />
                        <HistoryList />
                    </aside>

                    <main class="flex-1 min-w-0">
                        <Routes>
                            <Route path="/" view=Dashboard />
                            <Route path="/login" view=Login />
                            <Route path="/dataset/:id" view=DatasetLink />
                            <Route path="/*any" view=|| view! { <Redirect path="/" /> } />
                        </Routes>
                    </main>
                </div>
            </div>
        </Router>
    }
}

/// Deep link: select the dataset, then land on the root view
#[component]
fn DatasetLink() -> impl IntoView {
    let state = use_global_state();
    let pathname = use_location().pathname.get_untracked();

    let navigation = DashboardRoute::parse(&pathname).resolve();
    if let Some(id) = navigation.select {
        state.select(id);
    }
    let target = navigation
        .redirect
        .unwrap_or(DashboardRoute::Root)
        .path();

    view! { <Redirect path=target /> }
}
