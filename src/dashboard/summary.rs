//! Summary Panel
//!
//! Aggregate statistics for the active dataset, plus the PDF report download.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::upload::BusyGuard;
use crate::api::endpoints::report_filename;
use crate::api::DatasetApi;
use crate::error::ClientResult;
use crate::guard::RequestGuard;
use crate::model::{DatasetId, DatasetSummary};
use crate::view::{LoadState, SummaryView};


pub struct SummaryPanel {
    api: Arc<dyn DatasetApi>,
    guard: RequestGuard,
    state: RwLock<LoadState<DatasetSummary>>,
    downloading: AtomicBool,
    report_dir: PathBuf,
}

impl SummaryPanel {
    pub fn new(api: Arc<dyn DatasetApi>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            guard: RequestGuard::new(),
            state: RwLock::new(LoadState::Idle),
            downloading: AtomicBool::new(false),
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Fetch the summary for `id`. A failure leaves the panel empty.
    pub async fn load(&self, id: DatasetId) {
        let ticket = self.guard.begin();
        *self.state.write().await = LoadState::Loading;

        let result = self.api.get_dataset_summary(id).await;
        if !self.guard.is_current(ticket) {
            tracing::debug!(dataset_id = id, "Discarding stale summary");
            return;
        }

        if let Err(e) = &result {
            tracing::warn!(dataset_id = id, error = %e, "Failed to load summary");
        }
        *self.state.write().await = result.into();
    }

    pub async fn clear(&self) {
        self.guard.reset();
        *self.state.write().await = LoadState::Idle;
    }

    pub async fn state(&self) -> LoadState<DatasetSummary> {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> Option<SummaryView> {
        self.state.read().await.ready().map(SummaryView::from)
    }

    /// Generate the PDF report and write it as `report_dataset_<id>.pdf`
    pub async fn download_report(&self, id: DatasetId) -> ClientResult<PathBuf> {
        let _busy = BusyGuard::acquire(&self.downloading, "Report download")?;

        let bytes = self.api.generate_pdf(id).await.map_err(|e| {
            tracing::warn!(dataset_id = id, error = %e, "Report generation failed");
            e
        })?;

        tokio::fs::create_dir_all(&self.report_dir).await?;
        let path = self.report_dir.join(report_filename(id));
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(dataset_id = id, path = ?path, bytes = bytes.len(), "Report saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::error::ClientError;
    use crate::view::status::REPORT_FALLBACK;

    #[tokio::test]
    async fn test_load_renders_cards() {
        let dir = tempfile::tempdir().unwrap();
        let panel = SummaryPanel::new(Arc::new(FakeApi::new()), dir.path());

        assert_eq!(panel.state().await, LoadState::Idle);
        panel.load(1).await;

        let view = panel.view().await.unwrap();
        assert_eq!(view.cards[0].value, "4");
        assert_eq!(view.cards[1].value, "10.00");
        assert_eq!(view.cards[2].value, "—");
    }

    #[tokio::test]
    async fn test_failed_load_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let panel = SummaryPanel::new(Arc::new(FakeApi::new()), dir.path());

        panel.load(42).await;
        assert_eq!(panel.state().await, LoadState::Failed);
        assert!(panel.view().await.is_none());
    }

    #[tokio::test]
    async fn test_last_requested_wins() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::new());
        api.delay(1, 50);
        let panel = SummaryPanel::new(api, dir.path());

        // The slow response for 1 arrives after the one for 2
        tokio::join!(panel.load(1), panel.load(2));

        let view = panel.view().await.unwrap();
        assert_eq!(view.cards[0].value, "2");
    }

    #[tokio::test]
    async fn test_download_report() {
        let dir = tempfile::tempdir().unwrap();
        let panel = SummaryPanel::new(Arc::new(FakeApi::new()), dir.path().join("reports"));

        let path = panel.download_report(2).await.unwrap();
        assert!(path.ends_with("report_dataset_2.pdf"));
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_download_report_error_message() {
        let dir = tempfile::tempdir().unwrap();
        let panel = SummaryPanel::new(Arc::new(FakeApi::new()), dir.path());

        let err = panel.download_report(404).await.unwrap_err();
        assert_eq!(err.user_message(REPORT_FALLBACK), "Not found.");

        let bare = ClientError::Http {
            status: 500,
            message: None,
        };
        assert_eq!(bare.user_message(REPORT_FALLBACK), "PDF generation failed");
    }

    #[tokio::test]
    async fn test_one_download_at_a_time() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeApi::new());
        api.delay(1, 50);
        let panel = SummaryPanel::new(api.clone(), dir.path());

        let (first, second) = tokio::join!(panel.download_report(1), panel.download_report(1));
        assert!(first.is_ok());
        assert!(matches!(second, Err(ClientError::Busy(_))));
        assert_eq!(api.calls("pdf"), 1);
    }
}
