// src/analyzer/fetch.rs
// =============================================================================
// Downloads the page to analyze and parses it into a document.
//
// Exactly one GET is sent, with no retry:
// - transport error      -> AnalyzeError::FetchFailed
// - status other than 200 -> AnalyzeError::UnexpectedStatus (body never read)
// - body read failure    -> AnalyzeError::ParseFailed
//
// The response is owned by `fetch_source` and dropped on every return
// path, which hands the connection back to the client.
// =============================================================================

use log::error;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Node};
use std::sync::Arc;
use url::Url;

use super::client::HttpClient;
use super::error::AnalyzeError;

/// A fetched page parsed into a queryable tree.
///
/// Belongs to a single analysis. It is not `Send`, so it has to be dropped
/// before the analysis awaits anything else.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Re-serializes the whole tree, doctype included.
    ///
    /// html5ever's serializer writes the doctype as `<!DOCTYPE name>` and
    /// drops the public/system identifiers, which would make every legacy
    /// doctype look like HTML5. The doctype node is therefore rendered by
    /// hand, the rest by scraper.
    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for child in self.html.tree.root().children() {
            match child.value() {
                Node::Doctype(doctype) => {
                    out.push_str("<!DOCTYPE ");
                    out.push_str(doctype.name());
                    let (public_id, system_id) = (doctype.public_id(), doctype.system_id());
                    if !public_id.is_empty() {
                        out.push_str(&format!(" PUBLIC \"{}\"", public_id));
                        if !system_id.is_empty() {
                            out.push_str(&format!(" \"{}\"", system_id));
                        }
                    } else if !system_id.is_empty() {
                        out.push_str(&format!(" SYSTEM \"{}\"", system_id));
                    }
                    out.push('>');
                }
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
                Node::Text(text) => out.push_str(text),
                Node::Element(_) => {
                    if let Some(element) = ElementRef::wrap(child) {
                        out.push_str(&element.html());
                    }
                }
                _ => {}
            }
        }

        out
    }
}

/// Performs the page GET through the injected client.
#[derive(Clone)]
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
}

impl Fetcher {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the raw page source.
    pub async fn fetch_source(&self, url: &Url) -> Result<String, AnalyzeError> {
        let response = self.client.get(url).await.map_err(|source| {
            error!("Failed to fetch the webpage {}: {}", url, source);
            AnalyzeError::FetchFailed {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("Non-200 status code for {}: {}", url, status);
            return Err(AnalyzeError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| {
            error!("Failed to read the webpage content for {}: {}", url, source);
            AnalyzeError::ParseFailed {
                url: url.to_string(),
                source,
            }
        })
    }

    /// GET + parse in one step. The caller must drop the document before
    /// its next `.await` to keep its future `Send`.
    pub async fn fetch_document(&self, url: &Url) -> Result<ParsedDocument, AnalyzeError> {
        let source = self.fetch_source(url).await?;
        Ok(ParsedDocument::parse(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::client::testing::{FakeClient, Reply};
    use crate::analyzer::error::ClientError;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_ok_parses_document() {
        let client = FakeClient::new()
            .page("https://example.com/", "<html><head><title>T</title></head></html>")
            .into_arc();
        let fetcher = Fetcher::new(client);

        let doc = fetcher.fetch_document(&url("https://example.com/")).await.unwrap();
        assert!(doc.serialize().contains("<title>T</title>"));
    }

    #[tokio::test]
    async fn test_non_200_is_unexpected_status() {
        let client = FakeClient::new()
            .reply("https://example.com/", Reply::Status(StatusCode::NOT_FOUND))
            .into_arc();
        let fetcher = Fetcher::new(client);

        let err = fetcher.fetch_source(&url("https://example.com/")).await.unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::UnexpectedStatus { status: StatusCode::NOT_FOUND, .. }
        ));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_other_2xx_is_still_unexpected() {
        let client = FakeClient::new()
            .reply("https://example.com/", Reply::Status(StatusCode::NO_CONTENT))
            .into_arc();
        let fetcher = Fetcher::new(client);

        let err = fetcher.fetch_source(&url("https://example.com/")).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::UnexpectedStatus { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_is_fetch_failed() {
        let client = FakeClient::new()
            .reply("https://example.com/", Reply::Fail(ClientError::Timeout))
            .into_arc();
        let fetcher = Fetcher::new(client);

        let err = fetcher.fetch_source(&url("https://example.com/")).await.unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::FetchFailed { source: ClientError::Timeout, .. }
        ));
    }

    #[tokio::test]
    async fn test_body_failure_is_parse_failed() {
        let client = FakeClient::new()
            .reply("https://example.com/", Reply::BrokenBody)
            .into_arc();
        let fetcher = Fetcher::new(client);

        let err = fetcher.fetch_source(&url("https://example.com/")).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::ParseFailed { .. }));
    }

    #[test]
    fn test_serialize_keeps_legacy_doctype_identifiers() {
        let doc = ParsedDocument::parse(
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><html><body></body></html>"#,
        );
        let serialized = doc.serialize().to_lowercase();
        assert!(serialized.starts_with("<!doctype html public \"-//w3c//dtd html 4.01//en\""));
        assert!(!serialized.contains("<!doctype html>"));
    }

    #[test]
    fn test_serialize_html5_doctype() {
        let doc = ParsedDocument::parse("<!doctype html><html><body><p>x</p></body></html>");
        let serialized = doc.serialize();
        assert!(serialized.starts_with("<!DOCTYPE html>"));
        assert!(serialized.contains("<p>x</p>"));
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<dyn HttpClient>?
//    - dyn lets the fetcher work with any client (reqwest or the test fake)
//    - Arc lets the fetcher and the link checker share one client
//
// 2. Html::parse_document never fails. Broken markup is repaired the way a
//    browser would repair it, so there is no "parse error" case here.
// -----------------------------------------------------------------------------
