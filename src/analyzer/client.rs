// src/analyzer/client.rs
// =============================================================================
// The HTTP capability the analyzer depends on.
//
// The fetcher and the reachability checker never talk to reqwest directly.
// They receive an `HttpClient` when they are constructed, which lets tests
// plug in an in-memory client instead of hitting the network.
//
// - GET: returns a response whose status can be inspected before the body
//   is read. Dropping the response releases the connection.
// - HEAD: only the status code matters.
// =============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::error::ClientError;

/// GET and HEAD, as needed by the analyzer.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a GET request. The body is not read until
    /// [`PageResponse::text`] is called.
    async fn get(&self, url: &Url) -> Result<Box<dyn PageResponse>, ClientError>;

    /// Sends a HEAD request and returns the response status.
    async fn head(&self, url: &Url, timeout: Duration) -> Result<StatusCode, ClientError>;
}

/// A GET response whose body has not been consumed yet.
#[async_trait]
pub trait PageResponse: Send {
    fn status(&self) -> StatusCode;

    /// Reads the whole body as text. Consumes the response.
    async fn text(self: Box<Self>) -> Result<String, ClientError>;
}

/// `HttpClient` backed by a shared `reqwest::Client` (connection pooling).
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds a client with the page fetch timeout and a bounded redirect
    /// policy. Probes pass their own timeout per request.
    pub fn new(fetch_timeout: Duration, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(fetch_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

struct ReqwestResponse(reqwest::Response);

#[async_trait]
impl PageResponse for ReqwestResponse {
    fn status(&self) -> StatusCode {
        self.0.status()
    }

    async fn text(self: Box<Self>) -> Result<String, ClientError> {
        Ok(self.0.text().await?)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<Box<dyn PageResponse>, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        Ok(Box::new(ReqwestResponse(response)))
    }

    async fn head(&self, url: &Url, timeout: Duration) -> Result<StatusCode, ClientError> {
        let response = self
            .client
            .head(url.clone())
            .timeout(timeout)
            .send()
            .await?;
        Ok(response.status())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ReqwestClient {
        ReqwestClient::new(Duration::from_secs(5), "page-analyzer-test").unwrap()
    }

    #[tokio::test]
    async fn test_get_reads_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>Hi</title>"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
        let response = client().get(&url).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "<title>Hi</title>");
    }

    #[tokio::test]
    async fn test_head_returns_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let status = client().head(&url, Duration::from_secs(5)).await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let result = client().head(&url, Duration::from_millis(100)).await;
        assert_eq!(result, Err(ClientError::Timeout));
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Port 9 (discard) is essentially never listening on localhost
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(client().head(&url, Duration::from_secs(2)).await.is_err());
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Box<dyn PageResponse> instead of reqwest::Response?
//    - The trait must not mention reqwest, or the fake could not implement it
//    - Boxing hides the concrete type behind the trait
//
// 2. Send + Sync on the trait means a client can be shared across tokio
//    tasks behind an Arc.
// -----------------------------------------------------------------------------
