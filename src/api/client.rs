//! Dataset API REST Client
//!
//! HTTP client for the equipment dataset backend. Attaches the bearer token
//! from the [`SessionContext`] to every request when one is present.

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::endpoints::{bearer, Endpoint, Method, UPLOAD_FIELD};
use super::{DatasetApi, UploadFile};
use crate::config::ApiConfig;
use crate::error::{extract_server_message, ClientError, ClientResult};
use crate::model::{
    AuthTokens, Dataset, DatasetDetail, DatasetId, DatasetSummary, EquipmentPage,
    EquipmentPageBody, LoginRequest, RegisterRequest, UploadResponse,
};
use crate::session::SessionContext;

/// REST client for the dataset API
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client for the configured API base
    pub fn new(config: &ApiConfig, session: SessionContext) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.normalized_base_url(),
            session,
        })
    }

    /// Normalized base URL, always ending in `/api`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let url = endpoint.url(&self.base_url);
        let builder = match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };

        match self.session.access_token() {
            Some(token) => builder.header(reqwest::header::AUTHORIZATION, bearer(&token)),
            None => builder,
        }
    }

    /// Send a request and turn non-success statuses into [`ClientError::Http`]
    async fn send(&self, endpoint: Endpoint, builder: RequestBuilder) -> ClientResult<Response> {
        let request_id = uuid::Uuid::new_v4();
        tracing::debug!(request_id = %request_id, endpoint = %endpoint, "Sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(request_id = %request_id, endpoint = %endpoint, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(request_id = %request_id, status = status.as_u16(), "Request completed");
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = extract_server_message(&body);
        tracing::warn!(
            request_id = %request_id,
            endpoint = %endpoint,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or("-"),
            "API returned an error"
        );

        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(endpoint, builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DatasetApi for ApiClient {
    async fn upload(&self, file: UploadFile) -> ClientResult<UploadResponse> {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let endpoint = Endpoint::Upload;
        self.send_json(endpoint, self.request(endpoint).multipart(form))
            .await
    }

    async fn list_datasets(&self) -> ClientResult<Vec<Dataset>> {
        let endpoint = Endpoint::Datasets;
        self.send_json(endpoint, self.request(endpoint)).await
    }

    async fn get_dataset(&self, id: DatasetId) -> ClientResult<DatasetDetail> {
        let endpoint = Endpoint::Dataset(id);
        self.send_json(endpoint, self.request(endpoint)).await
    }

    async fn get_dataset_summary(&self, id: DatasetId) -> ClientResult<DatasetSummary> {
        let endpoint = Endpoint::DatasetSummary(id);
        self.send_json(endpoint, self.request(endpoint)).await
    }

    async fn get_equipment_page(&self, id: DatasetId, page: u32) -> ClientResult<EquipmentPage> {
        if page == 0 {
            return Err(ClientError::Validation(
                "Page numbers start at 1".to_string(),
            ));
        }

        let endpoint = Endpoint::Equipment { dataset: id, page };
        let body: EquipmentPageBody = self.send_json(endpoint, self.request(endpoint)).await?;
        Ok(body.into())
    }

    async fn generate_pdf(&self, id: DatasetId) -> ClientResult<Vec<u8>> {
        let endpoint = Endpoint::GeneratePdf(id);
        let builder = self.request(endpoint).json(&serde_json::json!({}));
        let response = self.send(endpoint, builder).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn login(&self, username: &str, password: &str) -> ClientResult<AuthTokens> {
        let endpoint = Endpoint::Login;
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send_json(endpoint, self.request(endpoint).json(&body))
            .await
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> ClientResult<AuthTokens> {
        let endpoint = Endpoint::Register;
        let body = RegisterRequest::new(username, password, email);
        self.send_json(endpoint, self.request(endpoint).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthTokens;
    use axum::{
        body::Bytes,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn auth_header(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none")
            .to_string()
    }

    fn mock_router() -> Router {
        Router::new()
            .route(
                "/api/datasets/",
                get(|headers: HeaderMap| async move {
                    Json(json!([{
                        "id": 7,
                        "filename": "a.csv",
                        "upload_timestamp": "2025-01-05T10:00:00Z",
                        "total_equipment_count": 3,
                        "avg_flowrate": "120.50",
                        // echo the auth header back through a field we can inspect
                        "avg_pressure": auth_header(&headers),
                    }]))
                }),
            )
            .route(
                "/api/datasets/:id/",
                get(|Path(id): Path<i64>| async move {
                    if id == 404 {
                        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})))
                            .into_response();
                    }
                    Json(json!({
                        "id": id,
                        "equipment_list": [
                            {"id": 1, "equipment_name": "P-1", "equipment_type": "Pump",
                             "flowrate": "120.00", "pressure": "5.20", "temperature": "110.00"}
                        ],
                        "type_summaries": [{"equipment_type": "Pump", "count": 1}]
                    }))
                    .into_response()
                }),
            )
            .route(
                "/api/datasets/:id/equipment/",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let page = q.get("page").cloned().unwrap_or_default();
                    Json(json!({
                        "count": 1,
                        "next": null,
                        "previous": null,
                        "results": [{"equipment_name": format!("page-{}", page), "equipment_type": "Valve"}]
                    }))
                }),
            )
            .route(
                "/api/datasets/:id/generate-pdf/",
                post(|Path(id): Path<i64>| async move {
                    if id == 500 {
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"error": "PDF generation failed: no data"})),
                        )
                            .into_response();
                    }
                    ([("content-type", "application/pdf")], b"%PDF-1.4 test".to_vec()).into_response()
                }),
            )
            .route(
                "/api/upload/",
                post(|headers: HeaderMap, body: Bytes| async move {
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let text = String::from_utf8_lossy(&body).to_string();
                    if !content_type.starts_with("multipart/form-data")
                        || !text.contains("name=\"file\"")
                    {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "No file provided."})),
                        )
                            .into_response();
                    }
                    if text.contains("duplicate") {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "Duplicate file. This CSV has already been uploaded."})),
                        )
                            .into_response();
                    }
                    (
                        StatusCode::CREATED,
                        Json(json!({"dataset_id": 7, "filename": "a.csv", "total_equipment_count": 3})),
                    )
                        .into_response()
                }),
            )
            .route(
                "/api/auth/login/",
                post(|Json(body): Json<serde_json::Value>| async move {
                    if body["password"] == "secret" {
                        Json(json!({"access": "acc", "refresh": "ref"})).into_response()
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid credentials"})))
                            .into_response()
                    }
                }),
            )
            .route(
                "/api/auth/register/",
                post(|Json(body): Json<serde_json::Value>| async move {
                    (
                        StatusCode::CREATED,
                        Json(json!({
                            "user": {"id": 1, "username": body["username"], "email": body["email"]},
                            "access": "acc",
                            "refresh": "ref"
                        })),
                    )
                }),
            )
    }

    async fn spawn_mock() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, mock_router()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn create_test_client() -> ApiClient {
        let base = spawn_mock().await;
        let config = ApiConfig {
            base_url: base,
            request_timeout_secs: Some(5),
        };
        ApiClient::new(&config, SessionContext::in_memory()).unwrap()
    }

    #[tokio::test]
    async fn test_base_url_is_normalized() {
        let client = create_test_client().await;
        assert!(client.base_url().ends_with("/api"));
    }

    #[tokio::test]
    async fn test_list_datasets_without_token() {
        let client = create_test_client().await;

        let datasets = client.list_datasets().await.unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].id, 7);
        assert_eq!(datasets[0].avg_flowrate.as_ref().and_then(|m| m.as_f64()), Some(120.5));
        assert_eq!(datasets[0].avg_pressure.as_ref().map(|m| m.to_string()).as_deref(), Some("none"));
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let client = create_test_client().await;
        client
            .session()
            .save(&AuthTokens {
                access: "tok-123".to_string(),
                refresh: "ref".to_string(),
                user: None,
            })
            .unwrap();

        let datasets = client.list_datasets().await.unwrap();
        assert_eq!(
            datasets[0].avg_pressure.as_ref().map(|m| m.to_string()).as_deref(),
            Some("Bearer tok-123")
        );
    }

    #[tokio::test]
    async fn test_get_dataset_and_not_found() {
        let client = create_test_client().await;

        let detail = client.get_dataset(3).await.unwrap();
        assert_eq!(detail.equipment_list.len(), 1);
        assert_eq!(detail.type_summaries[0].count, 1);

        let err = client.get_dataset(404).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.server_message(), Some("Not found."));
    }

    #[tokio::test]
    async fn test_equipment_page() {
        let client = create_test_client().await;

        let page = client.get_equipment_page(3, 2).await.unwrap();
        assert_eq!(page.results[0].equipment_name, "page-2");

        let err = client.get_equipment_page(3, 0).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upload_multipart() {
        let client = create_test_client().await;

        let response = client
            .upload(UploadFile::new("a.csv", b"Equipment Name,Type\nP-1,Pump\n".to_vec()))
            .await
            .unwrap();
        assert_eq!(response.dataset_id, 7);
        assert_eq!(response.total_equipment_count, 3);

        let err = client
            .upload(UploadFile::new("dup.csv", b"duplicate".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(
            err.user_message("Upload failed"),
            "Duplicate file. This CSV has already been uploaded."
        );
    }

    #[tokio::test]
    async fn test_generate_pdf() {
        let client = create_test_client().await;

        let bytes = client.generate_pdf(1).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let err = client.generate_pdf(500).await.unwrap_err();
        assert_eq!(
            err.user_message("PDF generation failed"),
            "PDF generation failed: no data"
        );
    }

    #[tokio::test]
    async fn test_login_and_register() {
        let client = create_test_client().await;

        let tokens = client.login("ana", "secret").await.unwrap();
        assert_eq!(tokens.access, "acc");

        let err = client.login("ana", "wrong").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("Invalid credentials"));

        let tokens = client.register("bob", "pw", None).await.unwrap();
        let user = tokens.user.unwrap();
        assert_eq!(user.username, "bob");
        assert_eq!(user.email, "");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: Some(2),
        };
        let client = ApiClient::new(&config, SessionContext::in_memory()).unwrap();

        let err = client.list_datasets().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
