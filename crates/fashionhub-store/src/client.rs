//! # Store Client
//!
//! The [`Store`] handle and the request plumbing shared by every repository.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  db.products().list(&query)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RestClient::request(GET, "products")                                   │
//! │       │  credentials() ← resolved NOW (picks up rotated keys)           │
//! │       │  apikey / Authorization / Content-Type headers                  │
//! │       ▼                                                                 │
//! │  + filters, order, pagination (repository)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RestClient::execute(request, "Failed to fetch products")               │
//! │       │                                                                 │
//! │       ├── no response   → StoreError::Network                           │
//! │       ├── non-2xx       → StoreError::Http (display = operation)        │
//! │       └── 2xx           → StoreResponse → decode_rows → contract checks │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{CredentialSource, SharedConfig};
use crate::error::{StoreError, StoreResult};
use crate::repository::category::CategoryRepository;
use crate::repository::product::ProductRepository;
use crate::transport::{HttpTransport, Method, StoreRequest, StoreResponse, Transport};

/// Path prefix of the table API.
const REST_PATH: [&str; 2] = ["rest", "v1"];

// =============================================================================
// REST Client
// =============================================================================

/// Builds, sends and checks REST requests.
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialSource>,
}

impl RestClient {
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialSource>) -> Self {
        RestClient {
            transport,
            credentials,
        }
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn credential_source(&self) -> Arc<dyn CredentialSource> {
        Arc::clone(&self.credentials)
    }

    /// Starts a request against `{base}/rest/v1/{table}` with the standard
    /// headers.
    pub fn request(&self, method: Method, table: &str) -> StoreResult<StoreRequest> {
        let creds = self.credentials.credentials()?;
        let url = creds.endpoint(&[REST_PATH[0], REST_PATH[1], table])?;

        let mut request = StoreRequest::new(method, url)
            .header("apikey", creds.api_key.as_str())
            .header("Authorization", format!("Bearer {}", creds.bearer_token))
            .header("Content-Type", "application/json");

        if method != Method::Get {
            request = request.header("Prefer", "return=representation");
        }

        Ok(request)
    }

    /// Sends `request`; any non-2xx status becomes `StoreError::Http` named
    /// after `operation`.
    pub async fn execute(
        &self,
        request: StoreRequest,
        operation: &str,
    ) -> StoreResult<StoreResponse> {
        let method = request.method;
        let response = self.transport.send(request).await.map_err(|e| {
            warn!(operation, error = %e, "Store request failed");
            StoreError::Network {
                operation: operation.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.is_success() {
            warn!(
                operation,
                %method,
                status = response.status,
                body = %truncate(&response.body, 200),
                "Store returned an error status"
            );
            return Err(StoreError::Http {
                operation: operation.to_string(),
                status: response.status,
            });
        }

        debug!(operation, status = response.status, "Store request succeeded");
        Ok(response)
    }
}

/// Decodes a JSON array of rows.
pub fn decode_rows<T: DeserializeOwned>(operation: &str, body: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(body).map_err(|e| StoreError::decode(operation, e.to_string()))
}

/// Decodes the first row of a `return=representation` write.
pub fn decode_first<T: DeserializeOwned>(operation: &str, body: &str) -> StoreResult<Option<T>> {
    Ok(decode_rows::<T>(operation, body)?.into_iter().next())
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let config = SharedConfig::new(DashboardConfig::load(None)?);
/// let store = Store::new(config)?;
///
/// let page = store.products().list(&ProductQuery::new().search("shirt")).await?;
/// let categories = store.categories().list().await?;
/// ```
#[derive(Clone)]
pub struct Store {
    rest: RestClient,
}

impl Store {
    /// Creates a store client over HTTP using the shared configuration for
    /// both the timeout and per-request credentials.
    pub fn new(config: SharedConfig) -> StoreResult<Self> {
        let timeout = config.snapshot()?.timeout();
        let transport = HttpTransport::new(timeout)?;
        Ok(Store::with_transport(Arc::new(transport), Arc::new(config)))
    }

    /// Creates a store client over any transport (tests, proxies).
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        Store {
            rest: RestClient::new(transport, credentials),
        }
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.rest.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.rest.clone())
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreCredentials;
    use crate::testing::RecordingTransport;

    fn client(transport: Arc<RecordingTransport>) -> RestClient {
        let creds = StoreCredentials::new("https://xyz.supabase.co", "anon", None).unwrap();
        RestClient::new(transport, Arc::new(creds))
    }

    #[test]
    fn test_standard_headers() {
        let rest = client(Arc::new(RecordingTransport::new()));

        let get = rest.request(Method::Get, "products").unwrap();
        assert_eq!(get.url.as_str(), "https://xyz.supabase.co/rest/v1/products");
        assert_eq!(get.header_value("apikey"), Some("anon"));
        assert_eq!(get.header_value("Authorization"), Some("Bearer anon"));
        assert_eq!(get.header_value("Content-Type"), Some("application/json"));
        assert_eq!(get.header_value("Prefer"), None);

        let post = rest.request(Method::Post, "products").unwrap();
        assert_eq!(post.header_value("Prefer"), Some("return=representation"));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_operation() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(StoreResponse::new(503, "unavailable"));
        let rest = client(transport);

        let request = rest.request(Method::Get, "categories").unwrap();
        let err = rest
            .execute(request, "Failed to fetch categories")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch categories");
        assert!(matches!(err, StoreError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport = Arc::new(RecordingTransport::new());
        transport.fail("connection refused");
        let rest = client(transport);

        let request = rest.request(Method::Get, "categories").unwrap();
        let err = rest.execute(request, "Failed to fetch categories").await.unwrap_err();
        assert!(matches!(err, StoreError::Network { .. }));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
