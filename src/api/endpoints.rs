//! REST surface of the dataset API
//!
//! Paths, methods and base URL handling shared by the native client and the
//! browser client.

use std::fmt;

use crate::model::DatasetId;

/// Base path used when no override is configured
pub const DEFAULT_API_BASE: &str = "/api";

/// Multipart field carrying the uploaded CSV
pub const UPLOAD_FIELD: &str = "file";

/// Normalize an API base URL so it always ends in `/api`.
///
/// `https://host` and `https://host/` both become `https://host/api`; an
/// empty value falls back to [`DEFAULT_API_BASE`].
pub fn normalize_api_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_BASE.to_string();
    }
    if trimmed.ends_with("/api") || trimmed == "api" {
        trimmed.to_string()
    } else {
        format!("{}/api", trimmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Upload,
    Datasets,
    Dataset(DatasetId),
    DatasetSummary(DatasetId),
    /// `page` is 1-based
    Equipment { dataset: DatasetId, page: u32 },
    GeneratePdf(DatasetId),
    Login,
    Register,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Upload | Endpoint::GeneratePdf(_) | Endpoint::Login | Endpoint::Register => {
                Method::Post
            }
            _ => Method::Get,
        }
    }

    /// Path relative to the API base, including the query string
    pub fn path(&self) -> String {
        match self {
            Endpoint::Upload => "/upload/".to_string(),
            Endpoint::Datasets => "/datasets/".to_string(),
            Endpoint::Dataset(id) => format!("/datasets/{}/", id),
            Endpoint::DatasetSummary(id) => format!("/datasets/{}/summary/", id),
            Endpoint::Equipment { dataset, page } => {
                format!("/datasets/{}/equipment/?page={}", dataset, page)
            }
            Endpoint::GeneratePdf(id) => format!("/datasets/{}/generate-pdf/", id),
            Endpoint::Login => "/auth/login/".to_string(),
            Endpoint::Register => "/auth/register/".to_string(),
        }
    }

    pub fn url(&self, api_base: &str) -> String {
        format!("{}{}", api_base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

/// File name offered for a downloaded report
pub fn report_filename(id: DatasetId) -> String {
    format!("report_dataset_{}.pdf", id)
}

/// `Authorization` header value for an access token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_api_base() {
        assert_eq!(normalize_api_base("https://example.com"), "https://example.com/api");
        assert_eq!(normalize_api_base("https://example.com/"), "https://example.com/api");
        assert_eq!(normalize_api_base("https://example.com/api/"), "https://example.com/api");
        assert_eq!(normalize_api_base("http://localhost:8000/api"), "http://localhost:8000/api");
        assert_eq!(normalize_api_base(""), "/api");
        assert_eq!(normalize_api_base("/api"), "/api");
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Datasets.path(), "/datasets/");
        assert_eq!(Endpoint::DatasetSummary(4).path(), "/datasets/4/summary/");
        assert_eq!(
            Endpoint::Equipment { dataset: 4, page: 2 }.path(),
            "/datasets/4/equipment/?page=2"
        );
        assert_eq!(Endpoint::GeneratePdf(9).method(), Method::Post);
        assert_eq!(Endpoint::Dataset(9).method(), Method::Get);
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            Endpoint::Upload.url("http://localhost:8000/api"),
            "http://localhost:8000/api/upload/"
        );
        assert_eq!(Endpoint::Login.to_string(), "POST /auth/login/");
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename(12), "report_dataset_12.pdf");
    }
}
