//! # Chemviz
//!
//! Chemical Equipment Parameter Visualizer - dashboard client for uploading
//! equipment CSV files to the dataset API and inspecting the results as
//! tables, charts and summary statistics.
//!
//! The backend owns every dataset; this crate only fetches, derives and
//! displays.
//!
//! ## Modules
//!
//! Always available (also compiled into the browser front end):
//!
//! - [`model`]: API payload types
//! - [`api::endpoints`]: REST paths and base URL rules
//! - [`session`]: token storage and the session context
//! - [`view`]: table, chart, summary and history derivations
//! - [`routes`]: deep-link resolution
//! - [`guard`]: last-requested-wins bookkeeping
//!
//! With the `native` feature (default):
//!
//! - [`api::ApiClient`]: reqwest client for the dataset API
//! - [`store`]: shared dataset cache
//! - [`dashboard`]: shell and panels
//! - [`config`], [`telemetry`], [`render`]: CLI plumbing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chemviz::api::{ApiClient, DatasetApi};
//! use chemviz::config::ApiConfig;
//! use chemviz::session::SessionContext;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(&ApiConfig::default(), SessionContext::in_memory())?;
//!
//!     for dataset in client.list_datasets().await? {
//!         println!("{} ({} equipment)", dataset.filename, dataset.total_equipment_count);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
pub mod guard;
pub mod model;
pub mod routes;
pub mod session;
pub mod view;

#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod dashboard;
#[cfg(feature = "native")]
pub mod render;
#[cfg(feature = "native")]
pub mod store;
#[cfg(feature = "native")]
pub mod telemetry;

// Re-export top-level types for convenience
pub use error::{ClientError, ClientResult};

pub use model::{
    AuthTokens, Dataset, DatasetDetail, DatasetId, DatasetSummary, EquipmentPage,
    EquipmentRecord, Measure, TypeSummary, UploadResponse,
};

pub use session::{SessionContext, SessionError, TokenStore};

pub use routes::{Navigation, Route};

#[cfg(feature = "native")]
pub use api::{ApiClient, DatasetApi, UploadFile};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};

#[cfg(feature = "native")]
pub use dashboard::{Dashboard, DashboardConfig, DashboardEvent};

#[cfg(feature = "native")]
pub use store::DatasetStore;
