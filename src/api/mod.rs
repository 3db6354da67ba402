//! Dataset API
//!
//! - [`endpoints`]: the REST contract (paths, methods, base URL rules)
//! - [`ApiClient`]: reqwest implementation of [`DatasetApi`] (native only)
//!
//! Panels and the shell talk to the backend only through [`DatasetApi`], so
//! they can run against a fake in tests.

pub mod endpoints;

#[cfg(feature = "native")]
mod client;

#[cfg(all(test, feature = "native"))]
pub(crate) mod fake;

pub use endpoints::{normalize_api_base, Endpoint, Method, DEFAULT_API_BASE};

#[cfg(feature = "native")]
pub use client::ApiClient;

#[cfg(feature = "native")]
pub use native::{DatasetApi, UploadFile};

#[cfg(feature = "native")]
mod native {
    use async_trait::async_trait;
    use std::path::Path;

    use crate::error::ClientResult;
    use crate::model::{
        AuthTokens, Dataset, DatasetDetail, DatasetId, DatasetSummary, EquipmentPage,
        UploadResponse,
    };

    /// A CSV file ready to be sent
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UploadFile {
        pub filename: String,
        pub bytes: Vec<u8>,
    }

    impl UploadFile {
        pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
            Self {
                filename: filename.into(),
                bytes,
            }
        }

        /// Read a file from disk; the upload keeps its base name
        pub async fn from_path(path: &Path) -> std::io::Result<Self> {
            let bytes = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "upload.csv".to_string());
            Ok(Self { filename, bytes })
        }
    }

    /// One method per remote operation
    #[async_trait]
    pub trait DatasetApi: Send + Sync {
        async fn upload(&self, file: UploadFile) -> ClientResult<UploadResponse>;

        /// Most recent first, as ordered by the server
        async fn list_datasets(&self) -> ClientResult<Vec<Dataset>>;

        async fn get_dataset(&self, id: DatasetId) -> ClientResult<DatasetDetail>;

        async fn get_dataset_summary(&self, id: DatasetId) -> ClientResult<DatasetSummary>;

        /// `page` is 1-based
        async fn get_equipment_page(&self, id: DatasetId, page: u32) -> ClientResult<EquipmentPage>;

        /// Raw PDF bytes
        async fn generate_pdf(&self, id: DatasetId) -> ClientResult<Vec<u8>>;

        async fn login(&self, username: &str, password: &str) -> ClientResult<AuthTokens>;

        async fn register(
            &self,
            username: &str,
            password: &str,
            email: Option<&str>,
        ) -> ClientResult<AuthTokens>;
    }
}
