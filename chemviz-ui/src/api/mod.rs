//! API Layer
//!
//! Browser client for the dataset API and the localStorage token store.

pub mod client;

pub use client::*;
