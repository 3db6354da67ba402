//! Shared Dataset Store
//!
//! The table and charts panels both need the full dataset payload for the
//! active id. The store fetches it once, shares concurrent requests for the
//! same id, and keeps successful results until invalidated.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::api::DatasetApi;
use crate::model::{DatasetDetail, DatasetId};

type PendingFetch = Shared<BoxFuture<'static, Option<Arc<DatasetDetail>>>>;

pub struct DatasetStore {
    api: Arc<dyn DatasetApi>,
    /// Completed fetches: DatasetId → payload
    cache: RwLock<HashMap<DatasetId, Arc<DatasetDetail>>>,
    /// Fetches in flight: DatasetId → shared future
    pending: Mutex<HashMap<DatasetId, PendingFetch>>,
}

impl DatasetStore {
    pub fn new(api: Arc<dyn DatasetApi>) -> Self {
        Self {
            api,
            cache: RwLock::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Dataset payload for `id`, or `None` if the fetch failed.
    ///
    /// Failures are logged and not cached, so the next call retries.
    pub async fn load(&self, id: DatasetId) -> Option<Arc<DatasetDetail>> {
        if let Some(hit) = self.cache.read().await.get(&id) {
            tracing::debug!(dataset_id = id, "Dataset cache hit");
            return Some(hit.clone());
        }

        let fetch = {
            let mut pending = self.pending.lock().await;
            pending
                .entry(id)
                .or_insert_with(|| self.start_fetch(id))
                .clone()
        };

        let result = fetch.clone().await;

        {
            let mut pending = self.pending.lock().await;
            if pending.get(&id).is_some_and(|p| p.ptr_eq(&fetch)) {
                pending.remove(&id);
            }
        }

        if let Some(detail) = &result {
            self.cache.write().await.insert(id, detail.clone());
        }
        result
    }

    fn start_fetch(&self, id: DatasetId) -> PendingFetch {
        let api = self.api.clone();
        async move {
            match api.get_dataset(id).await {
                Ok(detail) => Some(Arc::new(detail)),
                Err(e) => {
                    tracing::warn!(dataset_id = id, error = %e, "Failed to load dataset");
                    None
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Drop the cached payload for one dataset
    pub async fn invalidate(&self, id: DatasetId) {
        self.cache.write().await.remove(&id);
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn cached_ids(&self) -> Vec<DatasetId> {
        let mut ids: Vec<_> = self.cache.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[tokio::test]
    async fn test_load_caches_result() {
        let api = Arc::new(FakeApi::new());
        let store = DatasetStore::new(api.clone());

        let first = store.load(1).await.unwrap();
        let second = store.load(1).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(api.calls("detail 1"), 1);
        assert_eq!(store.cached_ids().await, vec![1]);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let api = Arc::new(FakeApi::new());
        api.delay(2, 30);
        let store = DatasetStore::new(api.clone());

        let (a, b) = tokio::join!(store.load(2), store.load(2));

        assert_eq!(a.unwrap().equipment_list.len(), 2);
        assert!(b.is_some());
        assert_eq!(api.calls("detail 2"), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let api = Arc::new(FakeApi::new());
        let store = DatasetStore::new(api.clone());

        assert!(store.load(99).await.is_none());
        assert!(store.load(99).await.is_none());
        assert_eq!(api.calls("detail 99"), 2);
        assert!(store.cached_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let api = Arc::new(FakeApi::new());
        let store = DatasetStore::new(api.clone());

        store.load(1).await;
        store.invalidate(1).await;
        store.load(1).await;

        assert_eq!(api.calls("detail 1"), 2);
    }
}
