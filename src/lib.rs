// src/lib.rs
// =============================================================================
// Library root. The binary in src/main.rs is a thin wrapper around this.
//
// Modules:
// - analyzer: the page-analysis pipeline (validate, fetch, inspect, links)
// - server: the POST /analyzer HTTP endpoint
// - logging: env_logger setup
// =============================================================================

pub mod analyzer;
pub mod logging;
pub mod server;

pub use analyzer::{AnalysisResult, AnalyzeError, AnalyzerConfig, AnalyzerService, PageAnalyzer};
