//! Data Table Component
//!
//! Equipment rows of the active dataset with a text filter and sortable
//! headers. Filter and sort are tracked independently; the rows come from
//! the shared dataset resource.

use leptos::*;

use chemviz::model::EquipmentRecord;
use chemviz::view::table::{Column, TableQuery};

use crate::components::loading::Loading;
use crate::state::use_global_state;

#[component]
pub fn DataTable() -> impl IntoView {
    let state = use_global_state();
    let dataset = state.dataset;
    let query = create_rw_signal(TableQuery::new());

    view! {
        <Suspense fallback=move || view! { <Loading /> }>
            {move || dataset.get().flatten().map(|detail| {
                let records = store_value(detail.equipment_list);
                let visible = move || {
                    records.with_value(|all| {
                        query.with(|q| q.apply(all).into_iter().cloned().collect::<Vec<EquipmentRecord>>())
                    })
                };

                view! {
                    <section class="bg-gray-800 rounded-xl p-4 space-y-4">
                        <div class="flex items-center justify-between gap-4">
                            <h2 class="text-xl font-semibold">"Equipment Data"</h2>
                            <input
                                type="text"
                                placeholder="Filter by name or type"
                                prop:value=move || query.with(|q| q.filter().to_string())
                                on:input=move |ev| {
                                    let text = event_target_value(&ev);
                                    query.update(|q| q.set_filter(text));
                                }
                                class="bg-gray-700 rounded-lg px-3 py-2 text-sm text-white
                                       border border-gray-600 focus:border-primary-500 focus:outline-none"
                            />
                        </div>
    
                        <div class="overflow-x-auto">
                            <table class="w-full text-sm">
                                <thead>
                                    <tr class="text-left text-gray-400 border-b border-gray-700">
                                        {Column::ALL.into_iter().map(|column| view! {
                                            <th
                                                class="py-2 pr-4 cursor-pointer select-none hover:text-white"
                                                on:click=move |_| query.update(|q| q.toggle_sort(column))
                                            >
                                                {move || query.with(|q| q.header(column))}
                                            </th>
                                        }).collect_view()}
                                    </tr>
                                </thead>
                                <tbody>
                                    {move || visible().into_iter().map(|record| view! {
                                        <tr class="border-b border-gray-700/50">
                                            {Column::ALL.into_iter().map(|column| view! {
                                                <td class="py-2 pr-4">{column.display(&record)}</td>
                                            }).collect_view()}
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    </section>
                }
            })}
        </Suspense>
    }
}
