//! Upload Panel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{DatasetApi, UploadFile};
use crate::error::{ClientError, ClientResult};
use crate::model::UploadResponse;
use crate::view::status::{
    upload_success_message, StatusMessage, NO_FILE_MESSAGE, UPLOAD_FALLBACK,
};

/// Clears a busy flag when the guarded action ends, however it ends
pub(crate) struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool, action: &'static str) -> ClientResult<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(ClientError::Busy(action));
        }
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct UploadPanel {
    api: Arc<dyn DatasetApi>,
    uploading: AtomicBool,
    status: RwLock<Option<StatusMessage>>,
}

impl UploadPanel {
    pub fn new(api: Arc<dyn DatasetApi>) -> Self {
        Self {
            api,
            uploading: AtomicBool::new(false),
            status: RwLock::new(None),
        }
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading.load(Ordering::SeqCst)
    }

    pub async fn status(&self) -> Option<StatusMessage> {
        self.status.read().await.clone()
    }

    /// Submit the selected file. With no file nothing is sent.
    ///
    /// A submit while another upload is running is rejected and leaves the
    /// status line alone.
    pub async fn submit(&self, file: Option<UploadFile>) -> ClientResult<UploadResponse> {
        let Some(file) = file else {
            *self.status.write().await = Some(StatusMessage::error(NO_FILE_MESSAGE));
            return Err(ClientError::Validation(NO_FILE_MESSAGE.to_string()));
        };

        let _busy = BusyGuard::acquire(&self.uploading, "Upload")?;
        *self.status.write().await = None;

        tracing::info!(filename = %file.filename, bytes = file.bytes.len(), "Uploading dataset");
        match self.api.upload(file).await {
            Ok(response) => {
                tracing::info!(
                    dataset_id = response.dataset_id,
                    equipment = response.total_equipment_count,
                    "Upload finished"
                );
                *self.status.write().await =
                    Some(StatusMessage::success(upload_success_message(&response)));
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Upload failed");
                *self.status.write().await =
                    Some(StatusMessage::error(e.user_message(UPLOAD_FALLBACK)));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    #[tokio::test]
    async fn test_no_file_issues_no_request() {
        let api = Arc::new(FakeApi::new());
        let panel = UploadPanel::new(api.clone());

        let err = panel.submit(None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(
            panel.status().await,
            Some(StatusMessage::error("Please select a CSV file"))
        );
        assert_eq!(api.calls("upload"), 0);
    }

    #[tokio::test]
    async fn test_success_message() {
        let panel = UploadPanel::new(Arc::new(FakeApi::new()));

        let response = panel
            .submit(Some(UploadFile::new("a.csv", b"x".to_vec())))
            .await
            .unwrap();
        assert_eq!(response.dataset_id, 7);
        assert_eq!(
            panel.status().await,
            Some(StatusMessage::success("Uploaded: a.csv (3 equipment)"))
        );
        assert!(!panel.is_uploading());
    }

    #[tokio::test]
    async fn test_server_error_message() {
        let panel = UploadPanel::new(Arc::new(FakeApi::new()));

        panel
            .submit(Some(UploadFile::new("empty.csv", Vec::new())))
            .await
            .unwrap_err();
        assert_eq!(
            panel.status().await,
            Some(StatusMessage::error("CSV file is empty."))
        );
        assert!(!panel.is_uploading());
    }

    #[test]
    fn test_busy_guard_rejects_second_holder() {
        let flag = AtomicBool::new(false);
        let first = BusyGuard::acquire(&flag, "Upload").unwrap();
        assert!(matches!(
            BusyGuard::acquire(&flag, "Upload"),
            Err(ClientError::Busy("Upload"))
        ));
        drop(first);
        assert!(BusyGuard::acquire(&flag, "Upload").is_ok());
    }
}
