//! Axum route handler for the pitch deck analysis API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_text_blocking, looks_like_pdf};
use crate::state::AppState;

/// Response header telling callers whether the body came from the model or is the placeholder.
pub const ANALYSIS_SOURCE_HEADER: &str = "x-analysis-source";

const FILE_FIELD: &str = "file";
const DEFAULT_FILE_NAME: &str = "document";

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/analyze-pitch
///
/// Multipart form with a single `file` field holding the deck PDF.
/// Returns the AnalysisResult JSON; see `ANALYSIS_SOURCE_HEADER` for provenance.
pub async fn handle_analyze_pitch(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    // Credential check comes first: nothing is read or extracted without it.
    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))?;

    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart upload: {e}");
        AppError::Validation("No file provided".to_string())
    })?;

    let upload = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    let analysis_id = Uuid::new_v4();
    info!(
        "[{analysis_id}] Received {} ({} bytes)",
        upload.file_name,
        upload.data.len()
    );
    if !looks_like_pdf(upload.content_type.as_deref(), &upload.data) {
        warn!(
            "[{analysis_id}] {} does not look like a PDF (content type: {:?})",
            upload.file_name, upload.content_type
        );
    }

    let deck_text = extract_text_blocking(upload.data, upload.file_name).await?;
    let scored = pipeline.analyze(analysis_id, &deck_text).await?;

    info!(
        "[{analysis_id}] Analysis complete: overall score {} ({})",
        scored.result.overall_score,
        scored.source.as_str()
    );

    Ok((
        [(ANALYSIS_SOURCE_HEADER, scored.source.as_str())],
        Json(scored.result),
    )
        .into_response())
}

/// Reads the first `file` field; other fields are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file", e))?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// A body over the configured limit is 413; any other stream fault is the client's 400.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {}", e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::models::AnalysisResult;
    use crate::analysis::pipeline::tests::{StubModel, VALID_REPLY};
    use crate::analysis::pipeline::ScoringPipeline;
    use crate::errors::GENERIC_FAILURE_MESSAGE;
    use crate::routes::build_router;

    const BOUNDARY: &str = "----pitch-test-boundary";

    const ONE_PAGE_DECK: &[u8] = include_bytes!("../../fixtures/one_page_deck.pdf");

    fn app(stub: Option<Arc<StubModel>>) -> Router {
        app_with_limit(stub, None)
    }

    fn app_with_limit(stub: Option<Arc<StubModel>>, max_upload_bytes: Option<usize>) -> Router {
        let pipeline = stub.map(|s| ScoringPipeline::new(s));
        build_router(AppState { pipeline }, max_upload_bytes)
    }

    /// Builds a multipart body with one part per `(field, file_name, content_type, data)`.
    fn multipart_body(parts: &[(&str, Option<&str>, &str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (field, file_name, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match file_name {
                Some(name) => {
                    format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n")
                }
                None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze-pitch")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let source = response
            .headers()
            .get(ANALYSIS_SOURCE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, source, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_credential_returns_500_for_valid_upload() {
        let body = multipart_body(&[("file", Some("deck.pdf"), "application/pdf", b"%PDF-1.4")]);
        let (status, _, json) = send(app(None), upload_request(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "OpenAI API key not configured");
    }

    /// A multipart stream cut off before its closing boundary is a 400 once
    /// read, so a 500 here shows the body was never parsed.
    #[tokio::test]
    async fn test_missing_credential_short_circuits_before_multipart_parsing() {
        let mut truncated = multipart_body(&[("file", Some("deck.pdf"), "application/pdf", b"%PDF-1.4")]);
        truncated.truncate(truncated.len() - format!("\r\n--{BOUNDARY}--\r\n").len());

        let stub = StubModel::replying(VALID_REPLY);
        let (status, _, _) = send(app(Some(stub.clone())), upload_request(truncated.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);

        let (status, _, json) = send(app(None), upload_request(truncated)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "OpenAI API key not configured");
    }

    #[tokio::test]
    async fn test_missing_credential_wins_over_bad_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze-pitch")
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(app(None), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_no_file_field_returns_400_without_model_call() {
        let stub = StubModel::replying(VALID_REPLY);
        let body = multipart_body(&[("note", None, "text/plain", b"hello")]);
        let (status, _, json) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_multipart_body_returns_400_without_model_call() {
        let stub = StubModel::replying(VALID_REPLY);
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze-pitch")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _, json) = send(app(Some(stub.clone())), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_upload_is_scored_from_file_name() {
        let stub = StubModel::replying(VALID_REPLY);
        let body = multipart_body(&[(
            "file",
            Some("acme-series-a.pdf"),
            "application/pdf",
            b"not really a pdf",
        )]);
        let (status, source, json) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("model"));
        let expected: AnalysisResult = serde_json::from_str(VALID_REPLY).unwrap();
        assert_eq!(json, serde_json::to_value(expected).unwrap());
        assert!(stub
            .last_request()
            .prompt
            .contains("Pitch deck file: acme-series-a.pdf"));
    }

    #[tokio::test]
    async fn test_valid_pdf_text_is_embedded_in_prompt() {
        let stub = StubModel::replying(VALID_REPLY);
        let body = multipart_body(&[("file", Some("acme.pdf"), "application/pdf", ONE_PAGE_DECK)]);
        let (status, source, _) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("model"));
        let prompt = stub.last_request().prompt;
        assert!(prompt.contains("Acme Robotics"), "prompt was {prompt:?}");
        assert!(!prompt.contains("Pitch deck file:"));
    }

    #[tokio::test]
    async fn test_whitespace_model_reply_returns_placeholder_with_200() {
        let stub = StubModel::replying(" \n\t ");
        let body = multipart_body(&[("file", Some("deck.pdf"), "application/pdf", b"garbage")]);
        let (status, source, json) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("placeholder"));
        assert_eq!(json, serde_json::to_value(AnalysisResult::placeholder()).unwrap());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_upload_over_configured_limit_returns_413() {
        let stub = StubModel::replying(VALID_REPLY);
        let body = multipart_body(&[("file", Some("big.pdf"), "application/pdf", &[b'x'; 4096])]);
        let (status, _, json) = send(
            app_with_limit(Some(stub.clone()), Some(256)),
            upload_request(body),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(json["error"].is_string());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_over_axum_default_limit_is_accepted() {
        let stub = StubModel::replying(VALID_REPLY);
        let large = vec![b'x'; 3 * 1024 * 1024];
        let body = multipart_body(&[("file", Some("large.pdf"), "application/pdf", large.as_slice())]);
        let (status, source, _) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("model"));
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_malformed_model_reply_returns_placeholder_with_200() {
        let stub = StubModel::replying("I think this deck is great!");
        let body = multipart_body(&[("file", Some("deck.pdf"), "application/pdf", b"garbage")]);
        let (status, source, json) = send(app(Some(stub)), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("placeholder"));
        assert_eq!(json, serde_json::to_value(AnalysisResult::placeholder()).unwrap());
        assert_eq!(json["overallScore"], 75);
        assert_eq!(json["investorReadiness"], "Good");
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_generic_500() {
        let stub = StubModel::empty();
        let body = multipart_body(&[("file", Some("deck.pdf"), "application/pdf", b"garbage")]);
        let (status, source, json) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(source.is_none());
        assert_eq!(json["error"], GENERIC_FAILURE_MESSAGE);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_file_without_name_uses_default_name() {
        let stub = StubModel::replying(VALID_REPLY);
        let body = multipart_body(&[("file", None, "application/octet-stream", b"\x00\x01")]);
        let (status, _, _) = send(app(Some(stub.clone())), upload_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(stub
            .last_request()
            .prompt
            .contains("Pitch deck file: document"));
    }
}
