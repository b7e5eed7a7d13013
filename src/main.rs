// src/main.rs
// =============================================================================
// Entry point of the page-analyzer binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr)
// 3. Dispatch to the subcommand: analyze one page, or serve HTTP
// 4. Exit with proper code (0 = success, 1 = analysis failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use cli::{Cli, Commands, Tuning};
use page_analyzer::analyzer::{AnalysisResult, AnalyzeError, PageAnalyzer};
use page_analyzer::{logging, server};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error (bad setup, server crash): exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = analysis succeeded / server shut down cleanly
//   Ok(1) = the page could not be analyzed
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logger already initialized: {}", e);
    }

    match cli.command {
        Commands::Analyze {
            page_url,
            json,
            tuning,
        } => handle_analyze(&page_url, json, &tuning).await,
        Commands::Serve { bind, tuning } => handle_serve(bind, &tuning).await,
    }
}

// Handles the 'analyze' subcommand
async fn handle_analyze(page_url: &str, json: bool, tuning: &Tuning) -> Result<i32> {
    let analyzer = PageAnalyzer::with_reqwest(&tuning.to_config())
        .context("failed to create HTTP client")?;

    match analyzer.analyze(page_url).await {
        Ok(result) => {
            print_result(&result, json)?;
            Ok(0)
        }
        Err(e) => {
            print_error(&e, json)?;
            Ok(1)
        }
    }
}

// Handles the 'serve' subcommand
async fn handle_serve(bind: SocketAddr, tuning: &Tuning) -> Result<i32> {
    log::info!("Starting web page analyzer server...");

    let analyzer = PageAnalyzer::with_reqwest(&tuning.to_config())
        .context("failed to create HTTP client")?;

    server::serve(bind, Arc::new(analyzer)).await?;
    Ok(0)
}

// Prints the result either as a table or JSON
fn print_result(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_table(result);
    }
    Ok(())
}

fn print_error(error: &AnalyzeError, json: bool) -> Result<()> {
    if json {
        let body = serde_json::json!({ "error": error.to_string() });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        eprintln!("❌ {}", error);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(result: &AnalysisResult) {
    println!("📄 {}", result.url);
    println!("{}", "=".repeat(60));
    println!("{:<24} {}", "HTML version", result.html_version);
    println!("{:<24} {}", "Title", result.title);
    println!("{:<24} {}", "Login form", if result.has_login_form { "yes" } else { "no" });
    println!();

    println!("📊 Headings:");
    if result.heading_counts.is_empty() {
        println!("   (none)");
    }
    for (tag, count) in &result.heading_counts {
        println!("   {:<6} {}", tag, count);
    }
    println!();

    println!("🔗 Links:");
    println!("   🏠 Internal: {}", result.internal_links);
    println!("   🌐 External: {}", result.external_links);
    println!("   ❌ Inaccessible: {}", result.inaccessible_links);
}
