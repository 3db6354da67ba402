//! Dashboard Page
//!
//! Summary, charts and table of the active dataset, or a welcome note when
//! nothing is selected.

use leptos::*;

use crate::components::{ChartsPanel, DataTable, SummaryStats};
use crate::state::use_global_state;

#[component]
pub fn Dashboard() -> impl IntoView {
    let current = use_global_state().current;

    view! {
        {move || {
            if current.get().is_some() {
                view! {
                    <div class="space-y-8">
                        <SummaryStats />
                        <ChartsPanel />
                        <DataTable />
                    </div>
                }.into_view()
            } else {
                view! { <Welcome /> }.into_view()
            }
        }}
    }
}

#[component]
fn Welcome() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[40vh] text-center text-gray-400 space-y-2">
            <div class="text-6xl mb-4">"📈"</div>
            <p>"Upload a CSV file to visualize chemical equipment data."</p>
            <p>"CSV columns: Equipment Name, Type, Flowrate, Pressure, Temperature"</p>
        </div>
    }
}
