//! HTTP API Client
//!
//! Functions for communicating with the dataset REST API. Paths and the
//! error-body rules come from the shared `chemviz` core so the browser and
//! the CLI agree on both.

use gloo_net::http::{Request, RequestBuilder, Response};
use std::sync::Arc;
use web_sys::{File, FormData, Storage};

use chemviz::api::endpoints::{bearer, normalize_api_base, Endpoint, Method, UPLOAD_FIELD};
use chemviz::api::DEFAULT_API_BASE;
use chemviz::error::{extract_server_message, ClientError, ClientResult};
use chemviz::model::{
    AuthTokens, Dataset, DatasetDetail, DatasetId, DatasetSummary, LoginRequest,
    RegisterRequest, UploadResponse,
};
use chemviz::session::{SessionContext, SessionError, TokenStore};

/// API base URL baked in at build time via `CHEMVIZ_API_URL`
pub fn api_base() -> String {
    normalize_api_base(option_env!("CHEMVIZ_API_URL").unwrap_or(DEFAULT_API_BASE))
}

// ============ Token Storage ============

/// Tokens kept in `window.localStorage`, so they survive reloads
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

fn local_storage() -> Result<Storage, SessionError> {
    web_sys::window()
        .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
        .local_storage()
        .map_err(|e| SessionError::Unavailable(format!("{:?}", e)))?
        .ok_or_else(|| SessionError::Unavailable("localStorage disabled".to_string()))
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().ok()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| SessionError::Write(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        local_storage()?
            .remove_item(key)
            .map_err(|e| SessionError::Write(format!("{:?}", e)))
    }
}

/// Session backed by localStorage
pub fn browser_session() -> SessionContext {
    SessionContext::new(Arc::new(LocalStorageTokenStore))
}

// ============ Request Plumbing ============

fn builder(endpoint: Endpoint, session: &SessionContext) -> RequestBuilder {
    let url = endpoint.url(&api_base());
    let builder = match endpoint.method() {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
    };
    match session.access_token() {
        Some(token) => builder.header("Authorization", &bearer(&token)),
        None => builder,
    }
}

fn network(err: gloo_net::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

fn decode(err: gloo_net::Error) -> ClientError {
    ClientError::Decode(err.to_string())
}

/// Pass successful responses through; turn the rest into `ClientError::Http`
async fn check(endpoint: Endpoint, response: Response) -> ClientResult<Response> {
    if response.ok() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.binary().await.unwrap_or_default();
    let message = extract_server_message(&body);
    web_sys::console::warn_1(
        &format!(
            "{} failed with {}: {}",
            endpoint,
            status,
            message.as_deref().unwrap_or("no message")
        )
        .into(),
    );
    Err(ClientError::Http { status, message })
}

async fn get_json<T: serde::de::DeserializeOwned>(
    endpoint: Endpoint,
    session: &SessionContext,
) -> ClientResult<T> {
    let response = builder(endpoint, session).send().await.map_err(network)?;
    check(endpoint, response).await?.json().await.map_err(decode)
}

async fn post_json<B, T>(endpoint: Endpoint, session: &SessionContext, body: &B) -> ClientResult<T>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let response = builder(endpoint, session)
        .json(body)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    check(endpoint, response).await?.json().await.map_err(decode)
}

// ============ API Functions ============

/// Upload a CSV file as multipart field `file`
pub async fn upload(session: &SessionContext, file: &File) -> ClientResult<UploadResponse> {
    let form = FormData::new().map_err(|e| ClientError::Validation(format!("{:?}", e)))?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
        .map_err(|e| ClientError::Validation(format!("{:?}", e)))?;

    let response = builder(Endpoint::Upload, session)
        .body(form)
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    check(Endpoint::Upload, response)
        .await?
        .json()
        .await
        .map_err(decode)
}

/// Most recent datasets first
pub async fn list_datasets(session: &SessionContext) -> ClientResult<Vec<Dataset>> {
    get_json(Endpoint::Datasets, session).await
}

pub async fn get_dataset(session: &SessionContext, id: DatasetId) -> ClientResult<DatasetDetail> {
    get_json(Endpoint::Dataset(id), session).await
}

pub async fn get_dataset_summary(
    session: &SessionContext,
    id: DatasetId,
) -> ClientResult<DatasetSummary> {
    get_json(Endpoint::DatasetSummary(id), session).await
}

/// Raw PDF bytes of the dataset report
pub async fn generate_pdf(session: &SessionContext, id: DatasetId) -> ClientResult<Vec<u8>> {
    let endpoint = Endpoint::GeneratePdf(id);
    let response = builder(endpoint, session)
        .json(&serde_json::json!({}))
        .map_err(network)?
        .send()
        .await
        .map_err(network)?;
    check(endpoint, response)
        .await?
        .binary()
        .await
        .map_err(decode)
}

pub async fn login(
    session: &SessionContext,
    username: &str,
    password: &str,
) -> ClientResult<AuthTokens> {
    let body = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    post_json(Endpoint::Login, session, &body).await
}

/// Register; an empty email is sent as `""`
pub async fn register(
    session: &SessionContext,
    username: &str,
    password: &str,
    email: Option<&str>,
) -> ClientResult<AuthTokens> {
    let body = RegisterRequest::new(username, password, email);
    post_json(Endpoint::Register, session, &body).await
}
