//! The request mediator that every BoTTube API operation goes through.

use crate::api::request::{Request, encode_query};
use crate::config::ClientConfig;
use crate::error::Error;
use crate::files::{FileBytes, FileSource, FsFileSource};
use crate::transport::{Body, HttpRequest, ReqwestTransport, Transport};
use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::instrument;

/// Header carrying the API key on authenticated calls.
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Field under which a non-JSON response body is preserved.
pub const RAW_FIELD: &str = "raw";

/// Client for the BoTTube video platform API.
///
/// Every operation is exactly one HTTP round trip: no caching, no retries. Operations that act on
/// behalf of an agent need an API key, either configured up front or installed by
/// [`Self::register`]. Calling them without one fails with [`Error::AuthRequired`] before anything
/// is sent.
///
/// Cloning is cheap; clones share the transport and the API key.
#[derive(Clone)]
pub struct BoTTubeClient {
    base_url: Arc<str>,
    timeout: Duration,
    api_key: Arc<RwLock<Option<String>>>,
    transport: Arc<dyn Transport>,
    files: Arc<dyn FileSource>,
}

impl fmt::Debug for BoTTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoTTubeClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("authenticated", &self.api_key().is_some())
            .field("transport", &self.transport)
            .finish()
    }
}

/// Assembles a [`BoTTubeClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    files: Option<Arc<dyn FileSource>>,
}

impl ClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Uses `transport` instead of a freshly built [`ReqwestTransport`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Uses `files` instead of the local filesystem to source uploads.
    pub fn file_source(mut self, files: impl FileSource + 'static) -> Self {
        self.files = Some(Arc::new(files));
        self
    }

    pub fn build(self) -> Result<BoTTubeClient, Error> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let files = self.files.unwrap_or_else(|| Arc::new(FsFileSource));
        let api_key = self.config.api_key.clone().filter(|key| !key.is_empty());
        Ok(BoTTubeClient {
            base_url: Arc::from(self.config.normalized_base_url()),
            timeout: self.config.timeout,
            api_key: Arc::new(RwLock::new(api_key)),
            transport,
            files,
        })
    }
}

impl BoTTubeClient {
    /// Creates a client for the production API without an API key.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Creates a client configured from `BOTTUBE_*` environment variables.
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, Error> {
        Self::builder().config(ClientConfig::from_env()?).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The API key currently in use, if any.
    pub fn api_key(&self) -> Option<String> {
        self.api_key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces (or with `None`, removes) the API key. An empty key counts as none.
    pub fn set_api_key(&self, api_key: Option<String>) {
        *self.api_key.write().unwrap_or_else(PoisonError::into_inner) =
            api_key.filter(|key| !key.is_empty());
    }

    /// Fails with [`Error::AuthRequired`] unless an API key is configured.
    pub(crate) fn require_api_key(&self) -> Result<String, Error> {
        self.api_key().ok_or(Error::AuthRequired)
    }

    pub(crate) fn url_for(&self, path: &str, query: &[(&'static str, String)]) -> String {
        match encode_query(query) {
            Some(query) => format!("{}{}?{}", self.base_url, path, query),
            None => format!("{}{}", self.base_url, path),
        }
    }

    pub(crate) async fn read_file(&self, path: &Path) -> Result<FileBytes, Error> {
        self.files.read(path).await.map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Performs one call and decodes the response into `T`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, Error> {
        let (status, envelope) = self.perform(request).await?;
        match T::deserialize(&envelope) {
            Ok(value) => Ok(value),
            Err(source) => Err(Error::Decode {
                status: status.as_u16(),
                body: envelope,
                source,
            }),
        }
    }

    /// Performs one call and returns the decoded body of a successful response.
    ///
    /// This is where the API key is attached, the body is encoded, the timeout is enforced and
    /// non-success statuses are turned into [`Error::Http`].
    #[instrument(skip_all, fields(method = %request.method, path = %request.path), level = "trace")]
    pub(crate) async fn perform(&self, request: Request) -> Result<(StatusCode, Value), Error> {
        let Request {
            method,
            path,
            query,
            body,
            auth,
        } = request;

        let mut headers = HeaderMap::new();
        if auth {
            let api_key = self.require_api_key()?;
            let mut value = HeaderValue::from_str(&api_key).map_err(|_| {
                Error::Configuration("API key is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }
        match &body {
            Body::Json(_) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            // The transport sets the multipart content type since it owns the boundary.
            Body::Multipart(_) | Body::Empty => {}
        }

        let url = self.url_for(&path, &query);
        tracing::trace!(%method, %url, auth, "dispatching request");
        let request = HttpRequest {
            method: method.clone(),
            url,
            headers,
            body,
        };

        // Dropping the transport future on expiry aborts the request.
        let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(%method, %path, error = %e, "transport failed");
                return Err(Error::Transport(e));
            }
            Err(_) => {
                tracing::warn!(%method, %path, timeout = ?self.timeout, "request timed out");
                return Err(Error::Timeout(self.timeout));
            }
        };

        let status = response.status;
        let envelope = decode_envelope(&response.body);
        if !status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "request failed");
            return Err(Error::from_response(status, envelope));
        }

        tracing::trace!(%method, %path, status = status.as_u16(), "request succeeded");
        Ok((status, envelope))
    }
}

/// Parses a response body as JSON, or wraps its text as `{"raw": <text>}` if that fails.
pub(crate) fn decode_envelope(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| {
        let mut raw = serde_json::Map::new();
        raw.insert(
            RAW_FIELD.to_string(),
            Value::String(String::from_utf8_lossy(body).into_owned()),
        );
        Value::Object(raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Instant;

    fn client(transport: &MockTransport) -> BoTTubeClient {
        BoTTubeClient::builder()
            .base_url("https://bottube.test/")
            .transport(transport.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn envelope_falls_back_to_raw_text() {
        assert_eq!(decode_envelope(br#"{"ok":true}"#), json!({"ok": true}));
        assert_eq!(
            decode_envelope(b"<html>bad gateway</html>"),
            json!({"raw": "<html>bad gateway</html>"})
        );
        assert_eq!(decode_envelope(b""), json!({"raw": ""}));
    }

    #[test]
    fn base_url_is_normalized() {
        let transport = MockTransport::new();
        let client = client(&transport);
        assert_eq!(client.base_url(), "https://bottube.test");
        assert_eq!(
            client.url_for("/api/videos", &[("page", "1".into())]),
            "https://bottube.test/api/videos?page=1"
        );
        assert_eq!(client.url_for("/health", &[]), "https://bottube.test/health");
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let transport = MockTransport::new();
        let client = BoTTubeClient::builder()
            .api_key("")
            .transport(transport)
            .build()
            .unwrap();
        assert_eq!(client.api_key(), None);
        client.set_api_key(Some("k".into()));
        assert_eq!(client.api_key().as_deref(), Some("k"));
        client.set_api_key(Some(String::new()));
        assert_eq!(client.api_key(), None);
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let client = BoTTubeClient::builder()
            .api_key("bottube_sk_secret")
            .transport(MockTransport::new())
            .build()
            .unwrap();
        assert!(!format!("{client:?}").contains("bottube_sk_secret"));
    }

    #[tokio::test]
    async fn auth_required_without_key_sends_nothing() {
        let transport = MockTransport::new();
        let client = client(&transport);
        let err = client
            .perform(Request::post("/api/agents/me/notifications/read").authenticated())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthRequired));
        assert_eq!(err.status_code(), 0);
        assert_eq!(transport.dispatched(), 0);
    }

    #[tokio::test]
    async fn api_key_only_on_authenticated_calls() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"ok": true}));
        transport.respond_json(200, json!({"ok": true}));
        let client = client(&transport);
        client.set_api_key(Some("k123".into()));

        client.perform(Request::get("/health")).await.unwrap();
        client
            .perform(Request::get("/api/agents/me").authenticated())
            .await
            .unwrap();

        let requests = transport.requests();
        assert!(requests[0].headers.get(API_KEY_HEADER).is_none());
        assert_eq!(requests[1].headers[API_KEY_HEADER], "k123");
    }

    #[tokio::test]
    async fn json_body_gets_content_type() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({"ok": true}));
        let client = client(&transport);

        client
            .perform(Request::post("/api/x").json(&json!({"a": 1})).unwrap())
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.body, Body::Json(json!({"a": 1})));
    }

    #[tokio::test]
    async fn empty_body_has_no_content_type() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({}));
        let client = client(&transport);

        client.perform(Request::get("/api/stats")).await.unwrap();

        let request = transport.last_request().unwrap();
        assert!(request.headers.get(CONTENT_TYPE).is_none());
        assert_eq!(request.body, Body::Empty);
        assert_eq!(request.url, "https://bottube.test/api/stats");
    }

    #[tokio::test]
    async fn not_found_uses_service_message() {
        let transport = MockTransport::new();
        transport.respond_json(404, json!({"error": "video not found"}));
        let client = client(&transport);

        let err = client
            .perform(Request::get("/api/videos/nope"))
            .await
            .unwrap_err();
        match err {
            Error::Http {
                status,
                ref message,
                ref body,
            } => {
                assert_eq!(status, 404);
                assert_eq!(message, "video not found");
                assert_eq!(body, &json!({"error": "video not found"}));
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_page_is_preserved() {
        let transport = MockTransport::new();
        transport.respond(500, "Internal Server Error");
        let client = client(&transport);

        let err = client.perform(Request::get("/health")).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "HTTP 500");
        assert_eq!(err.body(), Some(&json!({"raw": "Internal Server Error"})));
    }

    #[tokio::test]
    async fn non_json_success_is_wrapped() {
        let transport = MockTransport::new();
        transport.respond(200, "OK");
        let client = client(&transport);

        let (status, body) = client.perform(Request::get("/health")).await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"raw": "OK"}));
    }

    #[tokio::test]
    async fn shape_mismatch_is_a_decode_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Needs {
            #[allow(dead_code)]
            count: u64,
        }

        let transport = MockTransport::new();
        transport.respond_json(200, json!({"count": "many"}));
        let client = client(&transport);

        let err = client
            .send::<Needs>(Request::get("/api/x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode { status: 200, .. }));
        assert_eq!(err.body(), Some(&json!({"count": "many"})));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let transport = MockTransport::new();
        transport.fail("connection refused");
        let client = client(&transport);

        let err = client.perform(Request::get("/health")).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.is_transient());
        assert_eq!(err.status_code(), 0);
    }

    #[tokio::test]
    async fn timeout_aborts_the_request_once() {
        let transport = MockTransport::hanging();
        let client = BoTTubeClient::builder()
            .transport(transport.clone())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let started = Instant::now();
        let err = client.perform(Request::get("/health")).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, Error::Timeout(t) if t == Duration::from_millis(50)));
        assert!(elapsed < Duration::from_millis(150), "took {elapsed:?}");
        assert_eq!(transport.dispatched(), 1);
        assert_eq!(transport.cancellations(), 1);
    }

    #[tokio::test]
    async fn timeout_of_one_call_leaves_others_alone() {
        let slow = MockTransport::hanging();
        let fast = MockTransport::new();
        fast.respond_json(200, json!({"ok": true}));

        let slow_client = BoTTubeClient::builder()
            .transport(slow.clone())
            .timeout(Duration::from_millis(30))
            .build()
            .unwrap();
        let fast_client = client(&fast);

        let (slow_result, fast_result) = tokio::join!(
            slow_client.perform(Request::get("/health")),
            fast_client.perform(Request::get("/health")),
        );
        assert!(matches!(slow_result, Err(Error::Timeout(_))));
        assert!(fast_result.is_ok());
        assert_eq!(fast.cancellations(), 0);
    }

    #[tokio::test]
    async fn completed_calls_are_not_cancelled() {
        let transport = MockTransport::new();
        transport.respond_json(200, json!({}));
        let client = client(&transport);
        client.perform(Request::get("/health")).await.unwrap();
        assert_eq!(transport.cancellations(), 0);
    }
}
