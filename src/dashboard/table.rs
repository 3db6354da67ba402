//! Table Panel

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::guard::RequestGuard;
use crate::model::{DatasetDetail, DatasetId, EquipmentRecord};
use crate::store::DatasetStore;
use crate::view::table::{Column, TableQuery};
use crate::view::LoadState;

pub struct TablePanel {
    store: Arc<DatasetStore>,
    guard: RequestGuard,
    state: RwLock<LoadState<Arc<DatasetDetail>>>,
    query: RwLock<TableQuery>,
}

impl TablePanel {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self {
            store,
            guard: RequestGuard::new(),
            state: RwLock::new(LoadState::Idle),
            query: RwLock::new(TableQuery::new()),
        }
    }

    /// Fetch the full dataset for `id`; filter and sort survive the switch
    pub async fn load(&self, id: DatasetId) {
        let ticket = self.guard.begin();
        *self.state.write().await = LoadState::Loading;

        let detail = self.store.load(id).await;
        if self.guard.is_current(ticket) {
            *self.state.write().await = match detail {
                Some(detail) => LoadState::Ready(detail),
                None => LoadState::Failed,
            };
        }
    }

    pub async fn clear(&self) {
        self.guard.reset();
        *self.state.write().await = LoadState::Idle;
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading()
    }

    pub async fn set_filter(&self, filter: impl Into<String>) {
        self.query.write().await.set_filter(filter);
    }

    pub async fn toggle_sort(&self, column: Column) {
        self.query.write().await.toggle_sort(column);
    }

    pub async fn query(&self) -> TableQuery {
        self.query.read().await.clone()
    }

    /// Column headers with the sort indicator
    pub async fn headers(&self) -> Vec<String> {
        let query = self.query.read().await;
        Column::ALL.iter().map(|c| query.header(*c)).collect()
    }

    /// Visible rows, or `None` when nothing is loaded
    pub async fn rows(&self) -> Option<Vec<EquipmentRecord>> {
        let state = self.state.read().await;
        let detail = state.ready()?;
        let query = self.query.read().await;
        Some(
            query
                .apply(&detail.equipment_list)
                .into_iter()
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[tokio::test]
    async fn test_rows_follow_query() {
        let store = Arc::new(DatasetStore::new(Arc::new(FakeApi::new())));
        let panel = TablePanel::new(store);

        assert!(panel.rows().await.is_none());
        panel.load(1).await;
        assert_eq!(panel.rows().await.unwrap().len(), 4);

        panel.set_filter("valve").await;
        panel.toggle_sort(Column::Flowrate).await;
        panel.toggle_sort(Column::Flowrate).await;

        let rows = panel.rows().await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.equipment_name.as_str()).collect();
        assert_eq!(names, vec!["1-4", "1-2"]);
        assert_eq!(panel.headers().await[2], "Flowrate ↓");
    }

    #[tokio::test]
    async fn test_failed_load_is_empty() {
        let store = Arc::new(DatasetStore::new(Arc::new(FakeApi::new())));
        let panel = TablePanel::new(store);

        panel.load(404).await;
        assert!(panel.rows().await.is_none());
        assert!(!panel.is_loading().await);
    }
}
