//! Loading Component
//!
//! Loading spinners and skeleton states.

use leptos::*;

/// Panel-sized loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12">
            <div class="loading-spinner w-8 h-8" />
        </div>
    }
}

/// Inline loading spinner
#[component]
pub fn InlineLoading() -> impl IntoView {
    view! {
        <span class="inline-block loading-spinner w-4 h-4" />
    }
}

/// Skeleton loader for the summary cards
#[component]
pub fn CardSkeleton() -> impl IntoView {
    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4 animate-pulse">
            {(0..4).map(|_| view! {
                <div class="bg-gray-800 rounded-lg p-4">
                    <div class="h-4 bg-gray-700 rounded w-1/2 mb-3" />
                    <div class="h-8 bg-gray-700 rounded w-2/3" />
                </div>
            }).collect_view()}
        </div>
    }
}

/// Skeleton loader for chart
#[component]
pub fn ChartSkeleton() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-6 animate-pulse">
            <div class="h-6 bg-gray-700 rounded w-1/4 mb-4" />
            <div class="h-64 bg-gray-700 rounded" />
        </div>
    }
}
