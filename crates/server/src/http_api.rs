use axum::{
    body::{Body, Bytes},
    http::{Response as HttpResponse, StatusCode},
    response::Response,
};
use precis_summarizer::SummaryPipeline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Wire request for `POST /summarize/`
#[derive(Debug, Deserialize)]
pub(crate) struct SummarizeRequest {
    #[serde(default)]
    pub text: String,

    /// Accepted for interface compatibility; chunk sizing and output
    /// bounds do not depend on it.
    #[serde(default)]
    pub max_length: Option<usize>,
}

/// Wire response for `POST /summarize/`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct SummarizeResponse {
    pub summary: String,
    pub token_count: usize,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummarizeResponse {
    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self {
            summary: String::new(),
            token_count: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

pub(crate) async fn root_handler() -> Result<Response, StatusCode> {
    build_response(
        StatusCode::OK,
        &serde_json::json!({"message": "Welcome to the document summarizer API"}),
    )
}

pub(crate) async fn summarize_handler(
    body: Bytes,
    pipeline: Arc<SummaryPipeline>,
) -> Result<Response, StatusCode> {
    let Ok(request) = serde_json::from_slice::<SummarizeRequest>(&body) else {
        return build_response(
            StatusCode::BAD_REQUEST,
            &SummarizeResponse::failure("No text provided"),
        );
    };

    if request.text.trim().is_empty() {
        return build_response(
            StatusCode::BAD_REQUEST,
            &SummarizeResponse::failure("No text provided"),
        );
    }

    if let Some(max_length) = request.max_length {
        log::debug!("Client max_length={max_length} accepted but not applied");
    }

    match pipeline.summarize(&request.text).await {
        Ok(result) => build_response(
            StatusCode::OK,
            &SummarizeResponse {
                summary: result.summary,
                token_count: result.token_count,
                success: true,
                error: None,
            },
        ),
        Err(err) => {
            log::error!("Error in summary generation: {err}");
            build_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &SummarizeResponse::failure(err.to_string()),
            )
        }
    }
}

pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    payload: &T,
) -> Result<Response, StatusCode> {
    let bytes = serde_json::to_vec(payload).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        // Browser clients call this API cross-origin.
        .header("access-control-allow-origin", "*")
        .body(Body::from(bytes))
        .expect("valid HTTP response"))
}
