// src/server.rs
// =============================================================================
// HTTP endpoint for the analyzer.
//
// One route: POST /analyzer with {"webpageUrl": "..."}
// - 200 {"url": ..., "content": <AnalysisResult>} on success
// - 400 {"error": ...} for a bad body or a failed analysis
//
// Every request runs its own analysis. The only shared thing is the
// analyzer handle itself.
//
// BEGINNER NOTES:
// - The handler takes Result<Json<_>, JsonRejection> instead of Json<_>.
//   A plain Json<_> extractor would answer bad bodies with axum's own
//   error text; taking the Result lets us send our JSON error instead.
// - State<SharedAnalyzer> clones the Arc for each request, not the analyzer.
// =============================================================================

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::analyzer::{AnalysisRequest, AnalyzerService};

const BAD_REQUEST_MESSAGE: &str = "Invalid request format or missing webpageUrl";

pub type SharedAnalyzer = Arc<dyn AnalyzerService>;

/// Builds the router. Split from [`serve`] so tests can bind their own port.
pub fn router(analyzer: SharedAnalyzer) -> Router {
    Router::new()
        .route("/analyzer", post(analyze_handler))
        .with_state(analyzer)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, analyzer: SharedAnalyzer) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind analyzer server to {}: {}", addr, e))?;

    log::info!("Registering /analyzer endpoint");
    log::info!("Server is running on http://{}/", addr);

    axum::serve(listener, router(analyzer))
        .await
        .map_err(|e| anyhow::anyhow!("Analyzer server error: {}", e))?;

    Ok(())
}

async fn analyze_handler(
    State(analyzer): State<SharedAnalyzer>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) if !request.page_url.is_empty() => request,
        Ok(_) => return bad_request(BAD_REQUEST_MESSAGE),
        Err(rejection) => {
            log::debug!("Rejected request body: {}", rejection);
            return bad_request(BAD_REQUEST_MESSAGE);
        }
    };

    match analyzer.analyze(&request.page_url).await {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({
                "url": request.page_url,
                "content": result,
            })),
        )
            .into_response(),
        Err(e) => {
            log::warn!("Analysis of '{}' failed: {}", e.url(), e);
            bad_request(&e.to_string())
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
