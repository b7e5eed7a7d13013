// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
//   page-analyzer analyze <URL> [--json] [--max-concurrency N] ...
//   page-analyzer serve [--bind ADDR] ...
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::time::Duration;

use page_analyzer::analyzer::AnalyzerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "page-analyzer",
    version,
    about = "Analyze a web page: HTML version, title, headings, links and login forms",
    long_about = "page-analyzer fetches a single web page and reports its declared HTML version, \
                  title, heading counts, internal/external links, unreachable links and whether \
                  it appears to contain a login form. It can run once or as an HTTP service."
)]
pub struct Cli {
    /// Show debug logs (RUST_LOG is honored as well)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one page and print the report
    ///
    /// Example: page-analyzer analyze https://example.com --json
    Analyze {
        /// Page URL (http or https)
        page_url: String,

        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        tuning: Tuning,
    },

    /// Serve POST /analyzer over HTTP
    ///
    /// Example: page-analyzer serve --bind 127.0.0.1:8080
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: SocketAddr,

        #[command(flatten)]
        tuning: Tuning,
    },
}

/// Flags shared by both subcommands.
#[derive(Args, Debug, Clone)]
pub struct Tuning {
    /// Maximum number of link checks running at once
    #[arg(long, default_value_t = 50)]
    pub max_concurrency: usize,

    /// Timeout for each link check, in seconds
    #[arg(long, default_value_t = 10)]
    pub probe_timeout_secs: u64,

    /// Timeout for fetching the page itself, in seconds
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout_secs: u64,
}

impl Tuning {
    pub fn to_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            max_concurrent_probes: self.max_concurrency,
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            ..AnalyzerConfig::default()
        }
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pastes the fields of Tuning into each subcommand as flags
//    - Both analyze and serve get --max-concurrency without repeating it
//
// 2. Why is --bind a SocketAddr and not a String?
//    - clap parses it with FromStr, so "localhost8080" fails at startup
//      instead of when the server tries to bind
// -----------------------------------------------------------------------------
