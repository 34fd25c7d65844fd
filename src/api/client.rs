//! Catalog REST client implementation.
//!
//! Every resource follows the same plain-JSON contract: `GET` the collection,
//! `POST` a new record, `PUT` and `DELETE` at `{endpoint}/{id}`. Requests
//! carry no authentication and no query parameters, and failures are never
//! retried.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{Entity, EntityId};
use crate::config::Backend;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Shared HTTP client for one catalog backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The HTTP client.
    client: Client,
    /// Base URL without trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Create a client from the backend configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL or the HTTP
    /// client cannot be built.
    #[instrument(skip(backend), fields(base_url = %backend.base_url))]
    pub fn new(backend: &Backend) -> Result<Self> {
        info!("Creating catalog API client");

        let client = Self::build_http_client(Duration::from_secs(backend.timeout_secs))?;
        let base_url = normalize_base_url(&backend.base_url)?;

        Ok(Self { client, base_url })
    }

    /// Create a client for a base URL with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Self::build_http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        let base_url = normalize_base_url(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client(timeout: Duration) -> Result<Client> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a collection endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }

    /// A typed service for the collection at `path`.
    pub fn service<E: Entity>(&self, path: &str) -> RestService<E> {
        RestService::new(self.clone(), path)
    }

    /// Send one request and decode the JSON reply.
    ///
    /// An empty success body decodes to `Value::Null`.
    #[instrument(skip(self, body))]
    async fn request(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
        debug!("Sending request");

        let mut request = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            debug!(status = %status, "Error response body: {}", body);
            Err(Self::error_from_response(status, &url, &body))
        }
    }

    /// Create an appropriate error from an HTTP response.
    ///
    /// Uses a `message` or `error` string from a JSON body when there is one,
    /// otherwise the request URL.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        let context = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| {
                ["message", "error"].iter().find_map(|key| {
                    json.get(*key)
                        .and_then(Value::as_str)
                        .filter(|msg| !msg.is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| url.to_string());

        ApiError::from_status(status, &context)
    }
}

/// Outcome of a bulk delete, one entry per requested ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    /// IDs the backend confirmed as deleted.
    pub deleted: Vec<EntityId>,
    /// IDs that could not be deleted, with the reason.
    pub failed: Vec<(EntityId, String)>,
}

impl DeleteReport {
    /// Whether every requested deletion succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// CRUD operations on one entity collection.
#[async_trait]
pub trait EntityService<E: Entity>: Send + Sync {
    /// Fetch the whole collection.
    async fn fetch_all(&self) -> Result<Vec<E>>;

    /// Create a record and return it with server-assigned fields merged in.
    async fn add(&self, record: &E) -> Result<E>;

    /// Replace the record `id` and return the updated record.
    async fn edit(&self, id: &EntityId, record: &E) -> Result<E>;

    /// Delete the record `id`. `Ok(true)` means the backend confirmed it.
    async fn delete(&self, id: &EntityId) -> Result<bool>;

    /// Delete several records concurrently and settle every outcome.
    ///
    /// There is no atomicity: deletions that succeed stay applied even when
    /// others in the batch fail.
    async fn delete_many(&self, ids: Vec<EntityId>) -> DeleteReport {
        let outcomes = join_all(ids.iter().map(|id| self.delete(id))).await;

        let mut report = DeleteReport::default();
        for (id, outcome) in ids.into_iter().zip(outcomes) {
            match outcome {
                Ok(true) => report.deleted.push(id),
                Ok(false) => report
                    .failed
                    .push((id, "deletion was not confirmed".to_string())),
                Err(e) => report.failed.push((id, e.to_string())),
            }
        }
        report
    }
}

/// [`EntityService`] backed by a REST endpoint.
#[derive(Debug, Clone)]
pub struct RestService<E> {
    client: ApiClient,
    endpoint: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RestService<E> {
    /// Create a service for the collection at `path` under the client's base URL.
    pub fn new(client: ApiClient, path: &str) -> Self {
        let endpoint = client.endpoint(path);
        Self {
            client,
            endpoint,
            _entity: PhantomData,
        }
    }

    /// Collection URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// URL of a single record. The ID is percent-encoded.
    fn item_url(&self, id: &EntityId) -> String {
        format!("{}/{}", self.endpoint, urlencoding::encode(&id.to_string()))
    }

    /// Send `record` and merge the reply over what was sent.
    async fn send_record(&self, method: Method, url: &str, record: &E) -> Result<E> {
        let mut body = serde_json::to_value(record)?;
        let reply = self.client.request(method, url, Some(&body)).await?;
        merge_json(&mut body, reply);
        decode(body)
    }
}

#[async_trait]
impl<E: Entity> EntityService<E> for RestService<E> {
    async fn fetch_all(&self) -> Result<Vec<E>> {
        debug!(endpoint = %self.endpoint, "Fetching collection");

        let reply = self.client.request(Method::GET, &self.endpoint, None).await?;
        let items: Vec<E> = decode(reply)?;

        info!(endpoint = %self.endpoint, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn add(&self, record: &E) -> Result<E> {
        debug!(endpoint = %self.endpoint, "Creating record");
        let created = self.send_record(Method::POST, &self.endpoint, record).await?;
        info!(endpoint = %self.endpoint, id = %created.id(), "Created record");
        Ok(created)
    }

    async fn edit(&self, id: &EntityId, record: &E) -> Result<E> {
        debug!(endpoint = %self.endpoint, id = %id, "Updating record");
        let url = self.item_url(id);
        self.send_record(Method::PUT, &url, record).await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool> {
        debug!(endpoint = %self.endpoint, id = %id, "Deleting record");
        let url = self.item_url(id);
        self.client.request(Method::DELETE, &url, None).await?;
        Ok(true)
    }
}

/// Decode a JSON value into a typed record or collection.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("Unexpected response shape: {}", e)))
}

/// Overlay the fields of `patch` onto `base`.
///
/// A null patch (empty reply body) leaves `base` as sent; a non-object patch
/// replaces it.
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Normalize the base URL by removing trailing slashes and checking the scheme.
fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ApiError::InvalidUrl(format!(
            "'{}' must start with http:// or https://",
            url
        )));
    }

    if url.starts_with("http://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}", url);
    }

    Ok(url.to_string())
}
