// src/analyzer/error.rs
// =============================================================================
// Error types for the analysis pipeline.
//
// There are two kinds of failure:
// - Page-level failures (AnalyzeError): the whole analysis stops and no
//   result is produced.
// - Transport failures (ClientError): returned by the HTTP client. For the
//   page fetch they become AnalyzeError::FetchFailed / ParseFailed; for a
//   reachability probe they only mark that one link as inaccessible.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that abort an analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The input is empty, unparsable, or not an http(s) URL.
    #[error("invalid URL format: '{url}'")]
    InvalidUrl { url: String },

    /// The page could not be reached (DNS, connection refused, timeout...).
    #[error("failed to fetch the webpage: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: ClientError,
    },

    /// The page answered with something other than 200 OK.
    #[error("failed to fetch the webpage, status code: {status}")]
    UnexpectedStatus { url: String, status: StatusCode },

    /// The response body could not be read into a document.
    #[error("failed to read the webpage content: {source}")]
    ParseFailed {
        url: String,
        #[source]
        source: ClientError,
    },
}

impl AnalyzeError {
    /// The URL the failing analysis was working on (trimmed input for
    /// `InvalidUrl`).
    pub fn url(&self) -> &str {
        match self {
            AnalyzeError::InvalidUrl { url }
            | AnalyzeError::FetchFailed { url, .. }
            | AnalyzeError::UnexpectedStatus { url, .. }
            | AnalyzeError::ParseFailed { url, .. } => url,
        }
    }
}

/// Failures reported by an [`HttpClient`](super::HttpClient).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    Redirect,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ClientError::Timeout
        } else if error.is_redirect() {
            ClientError::Redirect
        } else if error.is_connect() {
            ClientError::Connect(error.to_string())
        } else {
            ClientError::Request(error.to_string())
        }
    }
}
