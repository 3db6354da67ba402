//! Charts Panel

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::guard::RequestGuard;
use crate::model::DatasetId;
use crate::store::DatasetStore;
use crate::view::{ChartSet, LoadState};

pub struct ChartsPanel {
    store: Arc<DatasetStore>,
    guard: RequestGuard,
    state: RwLock<LoadState<ChartSet>>,
}

impl ChartsPanel {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self {
            store,
            guard: RequestGuard::new(),
            state: RwLock::new(LoadState::Idle),
        }
    }

    pub async fn load(&self, id: DatasetId) {
        let ticket = self.guard.begin();
        *self.state.write().await = LoadState::Loading;

        let charts = self
            .store
            .load(id)
            .await
            .map(|detail| ChartSet::from_detail(&detail));
        if self.guard.is_current(ticket) {
            *self.state.write().await = match charts {
                Some(charts) => LoadState::Ready(charts),
                None => LoadState::Failed,
            };
        }
    }

    pub async fn clear(&self) {
        self.guard.reset();
        *self.state.write().await = LoadState::Idle;
    }

    pub async fn charts(&self) -> Option<ChartSet> {
        self.state.read().await.ready().cloned()
    }
}
