//! Chemviz Dashboard
//!
//! Browser dashboard for the equipment dataset API, built with Leptos (WASM).
//!
//! # Features
//!
//! - CSV upload with inline status
//! - Recent dataset history
//! - Summary statistics and PDF report download
//! - Type distribution, flowrate trend and percentage charts
//! - Filterable, sortable equipment table
//! - Login and registration
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Models, endpoint paths, session handling and every view
//! derivation come from the `chemviz` core crate; this crate only renders
//! them and talks HTTP through `gloo-net`. The API base URL is taken from
//! `CHEMVIZ_API_URL` at build time.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
