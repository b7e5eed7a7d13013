// src/analyzer/mod.rs
// =============================================================================
// The page-analysis pipeline.
//
// Submodules:
// - validate: checks the requested URL
// - client: the HTTP capability (trait + reqwest implementation)
// - fetch: downloads and parses the page
// - inspect: version, title, headings, login form
// - links: internal/external classification and reachability probes
// - error: the error types
//
// This file ties them together: `PageAnalyzer::analyze` runs
// Validate -> Fetch -> Inspect -> ClassifyLinks -> Assemble, stopping at
// the first page-level error. Nothing is retried and nothing is cached;
// every call starts from scratch.
// =============================================================================

mod client;
mod error;
mod fetch;
mod inspect;
mod links;
mod validate;

pub use client::{HttpClient, PageResponse, ReqwestClient};
pub use error::{AnalyzeError, ClientError};
pub use fetch::{Fetcher, ParsedDocument};
pub use inspect::{count_headings, extract_title, inspect, Inspection};
pub use links::{
    classify_href, scan_links, LinkBase, LinkClass, LinkCounts, LinkRecord, LinkScan,
    ProbeOutcome, ReachabilityChecker,
};
pub use validate::{validate_url, Validated};

use async_trait::async_trait;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Body accepted by the HTTP endpoint: `{ "webpageUrl": "..." }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisRequest {
    #[serde(rename = "webpageUrl")]
    pub page_url: String,
}

/// The report produced for one page.
///
/// Serialized with capitalized field names (`URL`, `HTMLVersion`, ...).
/// Failures are never part of the report; they travel as `AnalyzeError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "HTMLVersion")]
    pub html_version: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Only heading levels that actually occur, keyed by tag ("h1").
    #[serde(rename = "HeadingCounts")]
    pub heading_counts: BTreeMap<String, usize>,
    #[serde(rename = "InternalLinks")]
    pub internal_links: usize,
    #[serde(rename = "ExternalLinks")]
    pub external_links: usize,
    #[serde(rename = "InaccessibleLinks")]
    pub inaccessible_links: usize,
    #[serde(rename = "HasLoginForm")]
    pub has_login_form: bool,
}

/// Tunables for an analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound on simultaneous HEAD probes.
    pub max_concurrent_probes: usize,
    pub probe_timeout: Duration,
    pub fetch_timeout: Duration,
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_probes: 50,
            probe_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(10),
            user_agent: concat!("page-analyzer/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Anything that can analyze a page. The HTTP endpoint depends on this
/// rather than on `PageAnalyzer` directly.
#[async_trait]
pub trait AnalyzerService: Send + Sync {
    async fn analyze(&self, page_url: &str) -> Result<AnalysisResult, AnalyzeError>;
}

/// Runs the full pipeline against an injected HTTP client.
#[derive(Clone)]
pub struct PageAnalyzer {
    fetcher: Fetcher,
    checker: ReachabilityChecker,
}

impl PageAnalyzer {
    pub fn new(client: Arc<dyn HttpClient>, config: &AnalyzerConfig) -> Self {
        Self {
            fetcher: Fetcher::new(client.clone()),
            checker: ReachabilityChecker::new(
                client,
                config.max_concurrent_probes,
                config.probe_timeout,
            ),
        }
    }

    /// Analyzer that talks to the network through reqwest.
    pub fn with_reqwest(config: &AnalyzerConfig) -> Result<Self, ClientError> {
        let client = ReqwestClient::new(config.fetch_timeout, &config.user_agent)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub async fn analyze(&self, page_url: &str) -> Result<AnalysisResult, AnalyzeError> {
        debug!("Starting analysis for URL: {}", page_url);

        let Validated { normalized, url } = validate_url(page_url);
        let Some(url) = url else {
            error!("Invalid URL format: '{}'", normalized);
            return Err(AnalyzeError::InvalidUrl { url: normalized });
        };

        let base = LinkBase::new(url.clone(), &normalized);

        // The document is not Send: it must be gone before the link checks are awaited
        let (inspection, scan) = {
            let doc = self.fetcher.fetch_document(&url).await?;
            (inspect(&doc), scan_links(&doc, &base))
        };
        debug!(
            "Detected HTML version for {}: {}",
            normalized, inspection.html_version
        );
        debug!("Page title for {}: {}", normalized, inspection.title);

        let links = self.checker.check(scan).await;

        info!("Analysis complete for {}", normalized);
        Ok(AnalysisResult {
            url: normalized,
            html_version: inspection.html_version,
            title: inspection.title,
            heading_counts: inspection.heading_counts,
            internal_links: links.internal,
            external_links: links.external,
            inaccessible_links: links.inaccessible,
            has_login_form: inspection.has_login_form,
        })
    }
}

#[async_trait]
impl AnalyzerService for PageAnalyzer {
    async fn analyze(&self, page_url: &str) -> Result<AnalysisResult, AnalyzeError> {
        PageAnalyzer::analyze(self, page_url).await
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is analyze() an async fn on a trait object?
//    - Native async trait methods can't be used through dyn AnalyzerService
//    - #[async_trait] rewrites them to return a boxed Send future
//
// 2. What does the `?` after fetch_document do?
//    - On Err it returns the AnalyzeError from analyze() right away
//    - On Ok it unwraps the document and keeps going
// -----------------------------------------------------------------------------
