//! Async facade that performs the HTTP round-trip.
//!
//! # Design
//! `JService` pairs a `JServiceClient` with a `Transport`. Every query is
//! build, execute, parse: one GET, no retry, no caching. The `try_*`
//! methods return the full `ApiError`. The plain methods keep the
//! historical contract of the API wrapper this crate replaces: any failure
//! yields an empty `Vec`, so "no results" and "request failed" look alike.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::client::{JServiceClient, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Category, Clue};

/// Executes a single GET. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// Blocking ureq agent driven from tokio's blocking pool.
///
/// Status codes are returned as data rather than errors, and no timeout is
/// set: a server that never answers keeps the future pending. Bodies are
/// read in full with no size cap. Awaited outside a tokio runtime, every
/// request fails with `TransportError`.
#[derive(Clone, Debug)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ApiError::TransportError(e.to_string()))?;
        let agent = self.agent.clone();
        let task = runtime.spawn_blocking(move || {
            let mut response = agent
                .get(&request.url)
                .call()
                .map_err(|e| ApiError::TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let body = response
                .body_mut()
                .with_config()
                .limit(u64::MAX)
                .read_to_string()
                .map_err(|e| ApiError::TransportError(e.to_string()))?;
            Ok(HttpResponse { status, body })
        });
        task.await
            .map_err(|e| ApiError::TransportError(e.to_string()))?
    }
}

/// jservice client that owns its transport.
#[derive(Debug, Clone)]
pub struct JService<T = UreqTransport> {
    client: JServiceClient,
    transport: T,
}

impl JService<UreqTransport> {
    /// Client for the public endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }
}

impl Default for JService<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> JService<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: JServiceClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &JServiceClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Up to 100 categories from `offset`; a negative offset picks a random page.
    pub async fn try_categories(&self, count: u32, offset: i64) -> Result<Vec<Category>, ApiError> {
        let request = self.client.build_categories(count, offset)?;
        let response = self.fetch(request).await?;
        self.client.parse_categories(response)
    }

    /// Every clue of one category.
    pub async fn try_clues(&self, category_id: i64) -> Result<Vec<Clue>, ApiError> {
        let request = self.client.build_clues(category_id)?;
        let response = self.fetch(request).await?;
        self.client.parse_clues(category_id, response)
    }

    /// Up to 100 clues drawn from any category.
    pub async fn try_random_clues(&self, count: u32) -> Result<Vec<Clue>, ApiError> {
        let request = self.client.build_random_clues(count)?;
        let response = self.fetch(request).await?;
        self.client.parse_random_clues(response)
    }

    pub async fn categories(&self, count: u32, offset: i64) -> Vec<Category> {
        or_empty("categories", self.try_categories(count, offset).await)
    }

    pub async fn clues(&self, category_id: i64) -> Vec<Clue> {
        or_empty("category", self.try_clues(category_id).await)
    }

    pub async fn random_clues(&self, count: u32) -> Vec<Clue> {
        or_empty("random", self.try_random_clues(count).await)
    }

    async fn fetch(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        info!(url = %request.url, "downloading");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "response received");
        Ok(response)
    }
}

fn or_empty<R>(query: &'static str, result: Result<Vec<R>, ApiError>) -> Vec<R> {
    match result {
        Ok(records) => records,
        Err(err) if err.is_input_rejection() => {
            debug!(query, error = %err, "query rejected");
            Vec::new()
        }
        Err(err) => {
            warn!(query, error = %err, "query failed, returning no results");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a canned outcome and records every URL it was asked for.
    struct StubTransport {
        outcome: Result<String, String>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn body(body: &str) -> Self {
            Self {
                outcome: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                outcome: Err("connection refused".to_string()),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for StubTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(request.url);
            self.outcome
                .clone()
                .map(HttpResponse::ok)
                .map_err(ApiError::TransportError)
        }
    }

    fn service(transport: StubTransport) -> JService<StubTransport> {
        JService::with_transport("http://stub/api", transport)
    }

    #[test]
    fn default_transport_outside_tokio_is_empty() {
        let service = JService::with_base_url("http://127.0.0.1:9/api");
        assert!(futures::executor::block_on(service.random_clues(1)).is_empty());

        let err = futures::executor::block_on(service.try_random_clues(1)).unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
    }

    #[test]
    fn default_service_is_debug() {
        let rendered = format!("{:?}", JService::new());
        assert!(rendered.contains("http://jservice.io/api"), "{rendered}");
    }

    #[tokio::test]
    async fn oversized_counts_never_touch_the_network() {
        let service = service(StubTransport::body("[]"));
        for count in [101, 500, u32::MAX] {
            assert!(service.categories(count, 0).await.is_empty());
            assert!(service.random_clues(count).await.is_empty());
        }
        assert_eq!(service.transport().calls(), 0);
    }

    #[tokio::test]
    async fn negative_category_ids_never_touch_the_network() {
        let service = service(StubTransport::body(r#"{"clues":[]}"#));
        for id in [-1, -42, i64::MIN] {
            assert!(service.clues(id).await.is_empty());
        }
        assert_eq!(service.transport().calls(), 0);
        let err = service.try_clues(-1).await.unwrap_err();
        assert!(err.is_input_rejection());
    }

    #[tokio::test]
    async fn categories_round_trip() {
        let service = service(StubTransport::body(r#"[{"id":1,"title":"Science","clues":5}]"#));
        let categories = service.categories(1, 0).await;
        assert_eq!(
            categories,
            vec![Category {
                id: 1,
                title: "Science".to_string(),
                clue_count: 5,
            }]
        );
        let urls = service.transport().urls.lock().unwrap().clone();
        assert_eq!(urls, vec!["http://stub/api/categories?count=1&offset=0"]);
    }

    #[tokio::test]
    async fn clues_take_category_from_argument() {
        let service = service(StubTransport::body(
            r#"{"clues":[{"id":10,"value":200,"question":"Q","answer":"A"}]}"#,
        ));
        let clues = service.clues(7).await;
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].id, 10);
        assert_eq!(clues[0].category_id, 7);
        assert_eq!(clues[0].value, 200);
    }

    #[tokio::test]
    async fn random_clues_take_category_from_response() {
        let service = service(StubTransport::body(
            r#"{"clues":[{"id":11,"category_id":3,"value":400,"question":"Q2","answer":"A2"}]}"#,
        ));
        let clues = service.random_clues(1).await;
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].category_id, 3);
        assert_eq!(clues[0].question, "Q2");
        assert_eq!(clues[0].answer, "A2");
    }

    #[tokio::test]
    async fn transport_failures_collapse_to_empty() {
        let service = service(StubTransport::failing());
        assert!(service.categories(5, 0).await.is_empty());
        assert!(service.clues(1).await.is_empty());
        assert!(service.random_clues(5).await.is_empty());
        assert_eq!(service.transport().calls(), 3);

        let err = service.try_random_clues(5).await.unwrap_err();
        assert!(matches!(err, ApiError::TransportError(_)));
    }

    #[tokio::test]
    async fn malformed_json_collapses_to_empty() {
        let service = service(StubTransport::body("<html>502 Bad Gateway</html>"));
        assert!(service.categories(5, 0).await.is_empty());
        assert!(service.clues(1).await.is_empty());
        assert!(service.random_clues(5).await.is_empty());

        let err = service.try_categories(5, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[tokio::test]
    async fn negative_offset_is_randomized_before_fetch() {
        let service = service(StubTransport::body("[]"));
        for _ in 0..50 {
            service.categories(100, -1).await;
        }
        let urls = service.transport().urls.lock().unwrap().clone();
        assert_eq!(urls.len(), 50);
        for url in urls {
            let offset: i64 = url.rsplit("offset=").next().unwrap().parse().unwrap();
            assert!((1..=1500).contains(&offset), "{url}");
        }
    }
}
