//! UI Components
//!
//! Dashboard panels and shared building blocks.

pub mod charts_panel;
pub mod data_table;
pub mod header;
pub mod history_list;
pub mod loading;
pub mod login_form;
pub mod summary_stats;
pub mod upload_form;

pub use charts_panel::ChartsPanel;
pub use data_table::DataTable;
pub use header::Header;
pub use history_list::HistoryList;
pub use login_form::LoginForm;
pub use summary_stats::SummaryStats;
pub use upload_form::UploadForm;
