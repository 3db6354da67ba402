//! Pure view derivations
//!
//! Everything a panel shows is computed here from API payloads, so both the
//! terminal and the browser front end render the same numbers and labels.
//!
//! - [`table`]: filtering and column sorting of equipment rows
//! - [`charts`]: type distribution, flowrate trend, percentage breakdown
//! - [`summary`]: statistic cards and ranges
//! - [`history`]: recent dataset entries
//! - [`status`]: status lines and fallback messages

pub mod charts;
pub mod history;
pub mod status;
pub mod summary;
pub mod table;

pub use charts::{CategoryCount, ChartSet, Share, TrendPoint};
pub use history::{format_timestamp, history_entries, HistoryEntry};
pub use status::StatusMessage;
pub use summary::{format_average, StatCard, SummaryView};
pub use table::{Column, SortDirection, SortState, TableQuery};

/// Fetch lifecycle of one panel
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// No dataset selected
    #[default]
    Idle,
    Loading,
    Ready(T),
    /// Fetch failed; the panel renders nothing
    Failed,
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(value) => LoadState::Ready(f(value)),
            LoadState::Failed => LoadState::Failed,
        }
    }
}

impl<T, E> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadState::Ready(value),
            Err(_) => LoadState::Failed,
        }
    }
}
