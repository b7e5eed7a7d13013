// src/analyzer/links.rs
// =============================================================================
// Classifies the page's hyperlinks and checks external ones for reachability.
//
// How it works:
// 1. Scan every <a href> of the document (synchronous, in document order)
//    - empty hrefs and fragments ("", "#", "#top") are not links
//    - hrefs that don't parse as a URL are "malformed"
//    - relative hrefs are resolved against the page URL
//    - same host string as the page, exactly as written (case and port
//      included) -> internal, otherwise external
// 2. Send a HEAD request to every external link, concurrently but capped,
//    each with its own timeout
// 3. A link is inaccessible if its HEAD fails or answers with status >= 400.
//    Malformed hrefs are inaccessible too. Internal links are never probed.
//
// Probe outcomes are streamed back to the task that runs `check` and
// summed there, so no counter is ever shared between tasks.
// =============================================================================

use futures::future;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use reqwest::StatusCode;
use scraper::Selector;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::client::HttpClient;
use super::error::ClientError;
use super::fetch::ParsedDocument;

/// How a single href was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    Internal,
    External,
    Malformed,
}

/// One anchor seen while scanning. Only lives until the counts are built.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub raw_href: String,
    pub resolved: Option<Url>,
    pub class: LinkClass,
}

/// Result of scanning a document. Owns everything it needs, so the
/// document can be dropped before any probe is sent.
#[derive(Debug, Default)]
pub struct LinkScan {
    pub internal: usize,
    pub malformed: usize,
    pub external_targets: Vec<Url>,
}

/// Final link numbers for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub inaccessible: usize,
}

/// The analyzed page, as links are compared against it.
///
/// Keeps the host exactly as the caller wrote it (case and port included)
/// next to the parsed URL used to resolve relative hrefs.
#[derive(Debug, Clone)]
pub struct LinkBase {
    url: Url,
    host: String,
}

impl LinkBase {
    /// `raw` is the page URL string that `url` was parsed from.
    pub fn new(url: Url, raw: &str) -> Self {
        let host = authority_host(raw).unwrap_or_default().to_string();
        Self { url, host }
    }
}

/// Classifies one href relative to the page URL.
///
/// Returns `None` for hrefs that aren't links at all.
pub fn classify_href(base: &LinkBase, href: &str) -> Option<LinkRecord> {
    // Only the raw value is tested: "   " or " #x" are still links
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // join() handles both absolute hrefs and relative ones,
    // and strips surrounding whitespace itself
    let record = match base.url.join(href) {
        Ok(resolved) => {
            let class = if link_host(base, href) == base.host {
                LinkClass::Internal
            } else {
                LinkClass::External
            };
            LinkRecord {
                raw_href: href.to_string(),
                resolved: Some(resolved),
                class,
            }
        }
        Err(e) => {
            warn!("Failed to parse link href '{}': {}", href, e);
            LinkRecord {
                raw_href: href.to_string(),
                resolved: None,
                class: LinkClass::Malformed,
            }
        }
    };

    Some(record)
}

/// Host string of an href as written.
///
/// - "//host/x" or "scheme://host/x" -> "host" (userinfo dropped, port kept)
/// - "mailto:x" and other absolute URLs without authority -> ""
/// - relative hrefs inherit the page's host
fn link_host<'a>(base: &'a LinkBase, href: &'a str) -> &'a str {
    let href = href.trim();
    if let Some(host) = authority_host(href) {
        return host;
    }
    if Url::parse(href).is_ok() {
        return "";
    }
    &base.host
}

/// Authority host of `s` if it has one, without normalizing it.
fn authority_host(s: &str) -> Option<&str> {
    let rest = match s.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = s.split_once(':')?;
            let is_scheme = scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !is_scheme {
                return None;
            }
            rest.strip_prefix("//")?
        }
    };

    let authority = rest
        .split(|c: char| matches!(c, '/' | '?' | '#'))
        .next()
        .unwrap_or_default();
    // userinfo ends at the last '@'
    Some(authority.rsplit_once('@').map_or(authority, |(_, host)| host))
}

/// Walks every `<a href>` in document order.
pub fn scan_links(doc: &ParsedDocument, base: &LinkBase) -> LinkScan {
    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let mut scan = LinkScan::default();

    let records = doc
        .html()
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| classify_href(base, href));

    for record in records {
        debug!("Link '{}' classified as {:?}", record.raw_href, record.class);
        match (record.class, record.resolved) {
            (LinkClass::Internal, _) => scan.internal += 1,
            (LinkClass::External, Some(url)) => scan.external_targets.push(url),
            _ => scan.malformed += 1,
        }
    }

    scan
}

/// What a single HEAD probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable(StatusCode),
    ErrorStatus(StatusCode),
    Failed(ClientError),
}

impl ProbeOutcome {
    pub fn is_accessible(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable(_))
    }
}

/// Sends the HEAD probes for a scan's external links.
#[derive(Clone)]
pub struct ReachabilityChecker {
    client: Arc<dyn HttpClient>,
    max_concurrent: usize,
    probe_timeout: Duration,
}

impl ReachabilityChecker {
    /// `max_concurrent` of 0 is treated as 1.
    pub fn new(client: Arc<dyn HttpClient>, max_concurrent: usize, probe_timeout: Duration) -> Self {
        Self {
            client,
            max_concurrent: max_concurrent.max(1),
            probe_timeout,
        }
    }

    /// Probes one URL. Never fails: errors are part of the outcome.
    pub async fn probe(&self, url: &Url) -> ProbeOutcome {
        let response = tokio::time::timeout(
            self.probe_timeout,
            self.client.head(url, self.probe_timeout),
        )
        .await;

        let outcome = match response {
            Ok(Ok(status)) if status.as_u16() >= 400 => ProbeOutcome::ErrorStatus(status),
            Ok(Ok(status)) => ProbeOutcome::Reachable(status),
            Ok(Err(e)) => ProbeOutcome::Failed(e),
            Err(_) => ProbeOutcome::Failed(ClientError::Timeout),
        };

        if !outcome.is_accessible() {
            debug!("Link inaccessible: {} ({:?})", url, outcome);
        }
        outcome
    }

    /// Probes every target and returns how many are inaccessible.
    ///
    /// At most `max_concurrent` probes are in flight; returns once all of
    /// them have finished or timed out.
    pub async fn count_inaccessible(&self, targets: Vec<Url>) -> usize {
        stream::iter(targets)
            .map(|url| async move { self.probe(&url).await })
            .buffer_unordered(self.max_concurrent)
            .filter(|outcome| future::ready(!outcome.is_accessible()))
            .count()
            .await
    }

    /// Turns a scan into the final counts.
    pub async fn check(&self, scan: LinkScan) -> LinkCounts {
        let external = scan.external_targets.len();
        let unreachable = self.count_inaccessible(scan.external_targets).await;

        LinkCounts {
            internal: scan.internal,
            external,
            inaccessible: scan.malformed + unreachable,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why split scanning from probing?
//    - scraper's document is not Send (it can't move between threads)
//    - Scanning copies every URL we need into a LinkScan, which IS Send
//    - The document can then be dropped before the first .await
//
// 2. What does buffer_unordered(n) guarantee here?
//    - At most n probes run at the same time
//    - Results arrive in completion order, which is fine because we only
//      count them
//
// 3. Why no Mutex around the counters?
//    - Each probe returns its outcome instead of touching a counter
//    - The stream consumer (a single task) does the counting
// -----------------------------------------------------------------------------
